use crate::oracle::{Condition, Oracle};
use crate::report::{Report, SectionKind};
use tracing::info;

/// A node condition signals trouble when `Ready` reports anything other
/// than `"True"`, or any other condition type reports exactly `"True"`
/// (pressure, unavailability and similar types are healthy when false).
pub fn node_condition_is_problem(c: &Condition) -> bool {
    if c.kind == "Ready" {
        c.status != "True"
    } else {
        c.status == "True"
    }
}

/// Degraded or stuck-progressing operator conditions.
pub fn operator_condition_is_degraded(c: &Condition) -> bool {
    (c.kind == "Degraded" || c.kind == "Progressing") && c.status == "True"
}

pub fn format_node_problem(node: &str, c: &Condition) -> String {
    format!("[{node}] {}={} {} {}", c.kind, c.status, c.reason, c.message)
}

/// Pull the structured node list and flag abnormal conditions. A found
/// problem set is appended to the report; parse failures and missing
/// data yield an empty list.
pub fn extract_node_problems(oracle: &dyn Oracle, report: &mut Report) -> Vec<String> {
    let Some(list) = oracle.nodes_json().best_effort("node status query") else {
        return Vec::new();
    };
    let mut problems = Vec::new();
    for node in &list.items {
        for c in &node.status.conditions {
            if node_condition_is_problem(c) {
                problems.push(format_node_problem(&node.metadata.name, c));
            }
        }
    }
    if !problems.is_empty() {
        info!("{} problematic node conditions", problems.len());
        report.append_section(SectionKind::Other, "Problematic Nodes", &problems.join("\n"));
    }
    problems
}

/// Messages of an operator's degraded/progressing conditions. Missing
/// or malformed status yields an empty list.
pub fn extract_operator_degraded(oracle: &dyn Oracle, name: &str) -> Vec<String> {
    let Some(status) = oracle
        .operator_json(name)
        .best_effort(&format!("operator {name} status query"))
    else {
        return Vec::new();
    };
    status
        .conditions
        .iter()
        .filter(|c| operator_condition_is_degraded(c))
        .map(|c| c.message.clone())
        .collect()
}
