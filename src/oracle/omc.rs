use super::{Fetched, NodeList, Oracle, OperatorStatus};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const OMC_BIN: &str = "omc";

/// Adapter over the `omc` must-gather inspection binary.
///
/// Construction fails when the binary is not on PATH; after that every
/// query is best-effort and reported through [`Fetched`].
pub struct OmcOracle {
    bin: PathBuf,
}

impl OmcOracle {
    pub fn new() -> Result<Self> {
        let bin = find_in_path(OMC_BIN)
            .ok_or_else(|| anyhow!("missing dependency: {OMC_BIN} not found on PATH"))?;
        Ok(Self { bin })
    }

    pub fn binary(&self) -> &Path {
        &self.bin
    }

    /// Tool version string, for `doctor`.
    pub fn version(&self) -> Fetched<String> {
        self.run(&["version"])
    }

    fn run(&self, args: &[&str]) -> Fetched<String> {
        debug!("omc {}", args.join(" "));
        let out = match Command::new(&self.bin).args(args).output() {
            Ok(out) => out,
            Err(err) => return Fetched::Failed(format!("spawning {OMC_BIN}: {err}")),
        };
        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Fetched::Failed(format!(
                "{OMC_BIN} {} failed: {}{}",
                args.join(" "),
                stdout,
                stderr
            ));
        }
        if stdout.trim().is_empty() {
            return Fetched::Empty;
        }
        Fetched::Data(stdout)
    }

    fn run_json<T: DeserializeOwned>(&self, args: &[&str]) -> Fetched<T> {
        match self.run(args) {
            Fetched::Data(raw) => match serde_json::from_str(&raw) {
                Ok(parsed) => Fetched::Data(parsed),
                Err(err) => Fetched::Failed(format!("parsing {OMC_BIN} JSON output: {err}")),
            },
            Fetched::Empty => Fetched::Empty,
            Fetched::Failed(reason) => Fetched::Failed(reason),
        }
    }

    /// Newline-separated `-o name` output into a list of names.
    fn run_names(&self, args: &[&str]) -> Fetched<Vec<String>> {
        self.run(args).map(|raw| {
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

impl Oracle for OmcOracle {
    fn use_bundle(&self, path: &Path) -> Fetched<String> {
        let path = path.display().to_string();
        self.run(&["use", &path])
    }

    fn nodes_text(&self) -> Fetched<String> {
        self.run(&["get", "nodes"])
    }

    fn nodes_json(&self) -> Fetched<NodeList> {
        self.run_json(&["get", "nodes", "-o", "json"])
    }

    fn operator_json(&self, name: &str) -> Fetched<OperatorStatus> {
        #[derive(serde::Deserialize)]
        struct ClusterOperator {
            #[serde(default)]
            status: OperatorStatus,
        }
        self.run_json::<ClusterOperator>(&["get", "co", name, "-o", "json"])
            .map(|co| co.status)
    }

    fn list_pods(&self, namespace: &str, label: Option<&str>) -> Fetched<Vec<String>> {
        let mut args = vec!["get", "pods", "-n", namespace, "-o", "name"];
        if let Some(label) = label {
            args.push("-l");
            args.push(label);
        }
        self.run_names(&args)
    }

    fn containers(&self, namespace: &str, pod: &str) -> Fetched<Vec<String>> {
        self.run(&[
            "get",
            pod,
            "-n",
            namespace,
            "-o",
            "jsonpath={.spec.containers[*].name}",
        ])
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
    }

    fn logs(&self, namespace: &str, pod: &str, container: &str) -> Fetched<String> {
        self.run(&["logs", pod, "-n", namespace, "-c", container])
    }

    fn list_namespaces(&self) -> Fetched<Vec<String>> {
        self.run_names(&["get", "namespace", "-o", "name"])
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
