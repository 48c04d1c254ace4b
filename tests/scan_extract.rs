use bundle_triage::config::Scan;
use bundle_triage::scan::scan;

fn keywords() -> Vec<String> {
    Scan::default().keywords
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(scan("", &keywords(), 2).is_empty());
}

#[test]
fn deterministic_and_idempotent() {
    let text = "ok\nerror: disk full\nok\ntimeout waiting\nok";
    let first = scan(text, &keywords(), 2);
    let second = scan(text, &keywords(), 2);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn single_line_hit_is_the_window() {
    let out = scan("connection error", &keywords(), 2);
    assert_eq!(out, vec!["connection error".to_string()]);
}

#[test]
fn window_clamps_at_start() {
    // Hit at index 0 of a 10-line log: window is indices 0..=2.
    let lines: Vec<String> = (0..10)
        .map(|i| {
            if i == 0 {
                "ERROR at boot".to_string()
            } else {
                format!("line{i}")
            }
        })
        .collect();
    let out = scan(&lines.join("\n"), &keywords(), 2);
    assert_eq!(out, vec!["ERROR at boot", "line1", "line2"]);
}

#[test]
fn window_clamps_at_end() {
    let text = "line0\nline1\nline2\nfinal crash";
    let out = scan(text, &keywords(), 2);
    assert_eq!(out, vec!["line1", "line2", "final crash"]);
}

#[test]
fn window_bounds_in_five_line_log() {
    // Hit at index 1 with radius 2 covers indices 0..=3; line4 is out.
    let text = "line0\nERROR boom\nline2\nline3\nline4";
    let out = scan(text, &keywords(), 2);
    assert_eq!(out, vec!["line0", "ERROR boom", "line2", "line3"]);
}

#[test]
fn match_is_case_insensitive_substring() {
    let out = scan("request DENIED by policy", &keywords(), 2);
    assert_eq!(out.len(), 1);
}

#[test]
fn overlapping_windows_dedup_once_globally() {
    // Two adjacent hits share context lines; each line appears once,
    // in first-appearance order.
    let text = "a\nerror one\nerror two\nb";
    let out = scan(text, &keywords(), 2);
    assert_eq!(out, vec!["a", "error one", "error two", "b"]);
}

#[test]
fn dedup_preserves_first_appearance_order() {
    // Identical text on distant lines collapses to the first copy.
    let text = "error A\nB\nx\nx\nx\nerror A\nC";
    let out = scan(text, &keywords(), 1);
    assert_eq!(out, vec!["error A", "B", "x", "C"]);
}

#[test]
fn radius_is_configurable() {
    let text = "l0\nl1\nl2\nerror\nl4\nl5\nl6";
    let out = scan(text, &keywords(), 0);
    assert_eq!(out, vec!["error"]);
    let wide = scan(text, &keywords(), 3);
    assert_eq!(wide.len(), 7);
}
