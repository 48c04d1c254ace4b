use crate::util::dedup_preserving_order;

/// Scan raw log text for failure-indicator keywords.
///
/// Each hit contributes a context window of `radius` lines on either
/// side, clamped to the log's bounds. Windows may overlap; duplicates
/// are removed once at the end, keeping first-appearance order. Pure
/// function of its inputs; empty text yields an empty result.
pub fn scan(log_text: &str, keywords: &[String], radius: usize) -> Vec<String> {
    let lines: Vec<&str> = log_text.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let lowered = line.to_lowercase();
        let hit = keywords
            .iter()
            .any(|kw| lowered.contains(&kw.to_lowercase()));
        if !hit {
            continue;
        }
        let start = i.saturating_sub(radius);
        let end = (i + radius).min(lines.len() - 1);
        for window_line in &lines[start..=end] {
            found.push(window_line.to_string());
        }
    }

    dedup_preserving_order(found)
}
