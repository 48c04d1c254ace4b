use bundle_triage::report::{anchor_id, escape_html, Report, SectionKind};

#[test]
fn anchor_derivation_is_pure_and_stable() {
    assert_eq!(
        anchor_id("Operator authentication - Degraded"),
        "operator-authentication---degraded"
    );
    assert_eq!(
        anchor_id("Operator authentication - Degraded"),
        anchor_id("Operator authentication - Degraded")
    );
    assert_eq!(anchor_id("Pod: pod/x (ns:y)"), "pod--pod-x-(ns-y)");
}

#[test]
fn toc_lists_top_level_sections_in_append_order() {
    let mut report = Report::new("t");
    report.append_section(SectionKind::OperatorDegraded, "Operator x - Degraded", "boom");
    report.append_section(SectionKind::NodeStatus, "Node Status", "all fine");
    let html = report.to_html();

    let degraded_link = html.find("<a href=\"#operator-x---degraded\">").expect("degraded TOC entry");
    let nodes_link = html.find("<a href=\"#node-status\">").expect("node TOC entry");
    assert!(degraded_link < nodes_link);

    let degraded_section = html.find("<details id=\"operator-x---degraded\">").expect("degraded section");
    let nodes_section = html.find("<details id=\"node-status\">").expect("node section");
    assert!(degraded_section < nodes_section);
}

#[test]
fn failure_marker_only_on_degraded_sections() {
    let mut report = Report::new("t");
    report.append_section(SectionKind::OperatorDegraded, "Operator x - Degraded", "boom");
    report.append_section(SectionKind::NodeStatus, "Node Status", "all fine");
    let html = report.to_html();

    assert_eq!(html.matches("&#10060;").count(), 1);
    let marker = html.find("&#10060;").expect("failure marker");
    let nodes_section = html.find("<details id=\"node-status\">").expect("node section");
    assert!(marker < nodes_section);
}

#[test]
fn non_top_level_sections_stay_out_of_toc() {
    let mut report = Report::new("t");
    report.append_section(SectionKind::Other, "Container app Logs", "log text");
    let html = report.to_html();
    assert!(html.contains("<details id=\"container-app-logs\">"));
    assert!(!html.contains("<a href=\"#container-app-logs\">"));
}

#[test]
fn colliding_titles_get_suffixed_anchors() {
    let mut report = Report::new("t");
    report.append_section(SectionKind::NodeStatus, "Node Status", "first");
    report.append_section(SectionKind::NodeStatus, "Node Status", "second");
    let html = report.to_html();

    assert!(html.contains("<details id=\"node-status\">"));
    assert!(html.contains("<details id=\"node-status-2\">"));
    assert!(html.contains("<a href=\"#node-status\">"));
    assert!(html.contains("<a href=\"#node-status-2\">"));
}

#[test]
fn separator_precedes_each_operator_block() {
    let mut report = Report::new("t");
    report.append_section(SectionKind::OperatorDegraded, "Operator x - Degraded", "boom");
    report.append_section(SectionKind::OperatorLogs, "Operator x - Logs", "evidence");
    let html = report.to_html();

    assert_eq!(html.matches("<hr style=").count(), 1);
    let hr = html.find("<hr style=").expect("separator");
    let degraded = html.find("<details id=\"operator-x---degraded\">").expect("section");
    assert!(hr < degraded);
}

#[test]
fn bodies_and_titles_are_escaped() {
    let mut report = Report::new("t");
    report.append_section(
        SectionKind::Other,
        "Title <b>",
        "<script>alert(1)</script> & more",
    );
    let html = report.to_html();
    assert!(html.contains("Title &lt;b&gt;"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
    assert!(!html.contains("<script>alert(1)"));
}

#[test]
fn empty_body_renders_summary_only() {
    let mut report = Report::new("t");
    report.append_section(SectionKind::Other, "Pod: x (ns:y)", "");
    let html = report.to_html();
    assert!(html.contains("<details id=\"pod--x-(ns-y)\">"));
    let section = html.split("<details id=\"pod--x-(ns-y)\">").nth(1).expect("section tail");
    let closing = section.find("</details>").expect("closing tag");
    assert!(!section[..closing].contains("<pre"));
}

#[test]
fn hit_lines_stream_between_sections_escaped() {
    let mut report = Report::new("t");
    report.append_hit_line("[HIT] pod/c: a<b");
    let html = report.to_html();
    assert!(html.contains("[HIT] pod/c: a&lt;b<br>"));
}

#[test]
fn document_shell_has_toc_search_and_title() {
    let mut report = Report::new("Support-Bundle Triage Report");
    report.append_section(SectionKind::NodeStatus, "Node Status", "ok");
    let html = report.to_html();
    assert!(html.contains("<title>Support-Bundle Triage Report</title>"));
    assert!(html.contains("<h2>Table of Contents</h2>"));
    assert!(html.contains("id=\"searchBox\""));
    assert!(html.contains("function highlight(term)"));
}

#[test]
fn escape_html_covers_metacharacters() {
    assert_eq!(
        escape_html(r#"<a href="x">&'"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
    );
}
