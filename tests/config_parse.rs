use bundle_triage::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../bundle-triage.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.scan.context_radius, 2);
    assert_eq!(cfg.scan.max_line_chars, 500);
    assert_eq!(cfg.scan.max_search_chars, 500);
    assert_eq!(cfg.operators.len(), 5);
    assert!(cfg.scan.keywords.iter().any(|k| k == "degraded"));
    assert!(!cfg.paths.report_filename.is_empty());
}

#[test]
fn defaults_cover_platform_operators() {
    let cfg = Config::default();
    let names: Vec<&str> = cfg.operators.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["authentication", "image-registry", "dns", "ingress", "console"]
    );
    for op in &cfg.operators {
        assert!(!op.sources.is_empty());
        assert_eq!(op.sources[0].lines, 100);
    }
    assert_eq!(cfg.global.operator_pause_seconds, 3);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let raw = "[global]\noperator_pause_seconds = 1\nprint_summary = false\n";
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.global.operator_pause_seconds, 1);
    assert!(!cfg.global.print_summary);
    assert_eq!(cfg.scan.max_line_chars, 500);
    assert_eq!(cfg.operators.len(), 5);
    assert!(cfg.kcs.enabled);
}
