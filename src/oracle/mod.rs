pub mod omc;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub use omc::OmcOracle;

/// Outcome of one query against the bundle inspection tool.
///
/// Most callers deliberately collapse `Failed` into "no data" via
/// [`Fetched::best_effort`]; a partial report beats an aborted run.
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> Fetched<T> {
    /// Collapse `Failed` into `None`, logging the reason.
    pub fn best_effort(self, what: &str) -> Option<T> {
        match self {
            Fetched::Data(v) => Some(v),
            Fetched::Empty => None,
            Fetched::Failed(reason) => {
                warn!("{what}: {}", reason.trim());
                None
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Data(v) => Fetched::Data(f(v)),
            Fetched::Empty => Fetched::Empty,
            Fetched::Failed(reason) => Fetched::Failed(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeList {
    #[serde(default)]
    pub items: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub metadata: NodeMetadata,
    #[serde(default)]
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeMetadata {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OperatorStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Read-only view of a loaded must-gather/inspect bundle.
///
/// Every method is a synchronous, best-effort query; implementations
/// never panic on tool failure, they report it through [`Fetched`].
pub trait Oracle {
    /// Point the inspection tool at a bundle directory.
    fn use_bundle(&self, path: &Path) -> Fetched<String>;
    /// Human-readable node table.
    fn nodes_text(&self) -> Fetched<String>;
    /// Structured node list with status conditions.
    fn nodes_json(&self) -> Fetched<NodeList>;
    /// Structured status of one cluster operator.
    fn operator_json(&self, name: &str) -> Fetched<OperatorStatus>;
    /// Pod names in a namespace, optionally narrowed by label selector.
    fn list_pods(&self, namespace: &str, label: Option<&str>) -> Fetched<Vec<String>>;
    /// Container names of one pod.
    fn containers(&self, namespace: &str, pod: &str) -> Fetched<Vec<String>>;
    /// Raw log text of one container.
    fn logs(&self, namespace: &str, pod: &str, container: &str) -> Fetched<String>;
    /// Every namespace in the bundle.
    fn list_namespaces(&self) -> Fetched<Vec<String>>;
}
