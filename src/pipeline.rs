use crate::{
    ai::AiClient,
    conditions::{extract_node_problems, extract_operator_degraded},
    config::{Config, OperatorConfig},
    evidence::EvidenceCollector,
    kcs::KcsClient,
    oracle::{Fetched, Oracle},
    report::{Report, SectionKind},
};
use anyhow::{anyhow, bail, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const REPORT_TITLE: &str = "Support-Bundle Triage Report";

/// Drives one full pass over a loaded bundle: nodes, then each
/// configured operator, then the namespace-only fallback, then one
/// global combined-evidence step. Holds no extraction logic itself.
pub struct Pipeline<O: Oracle> {
    cfg: Config,
    oracle: O,
}

impl<O: Oracle> Pipeline<O> {
    pub fn new(cfg: &Config, oracle: O) -> Self {
        Self {
            cfg: cfg.clone(),
            oracle,
        }
    }

    /// Run the whole pass and write the report. Only bundle-load
    /// failure aborts; every later failure degrades into a report
    /// section or an absent one.
    pub fn run(
        &self,
        bundle: &Path,
        out_dir: Option<&Path>,
        only_operator: Option<&str>,
    ) -> Result<PathBuf> {
        let mut report = Report::new(REPORT_TITLE);
        let kcs = if self.cfg.kcs.enabled {
            Some(KcsClient::new(&self.cfg.kcs)?)
        } else {
            None
        };
        let ai = if self.cfg.ai.enabled {
            Some(AiClient::new(&self.cfg.ai)?)
        } else {
            None
        };

        match self.oracle.use_bundle(bundle) {
            Fetched::Data(out) => {
                report.append_section(SectionKind::MustGatherLoaded, "Must-Gather Loaded", &out)
            }
            Fetched::Empty => {
                report.append_section(SectionKind::MustGatherLoaded, "Must-Gather Loaded", "")
            }
            Fetched::Failed(reason) => bail!("loading bundle {}: {reason}", bundle.display()),
        }

        // Combined context feeds the final global search/analysis step.
        let mut combined = String::new();

        let nodes = self.oracle.nodes_text();
        let node_status_failed = matches!(nodes, Fetched::Failed(_));
        if let Some(text) = nodes.best_effort("node status query") {
            if !text.trim().is_empty() {
                report.append_section(SectionKind::NodeStatus, "Node Status", &text);
                let _ = writeln!(combined, "### Node Status\n{text}");
                let problems = extract_node_problems(&self.oracle, &mut report);
                if !problems.is_empty() {
                    let _ = writeln!(
                        combined,
                        "### Problematic Node Conditions\n{}",
                        problems.join("\n")
                    );
                }
            }
        }

        for op in self.selected_operators(only_operator)? {
            info!("checking operator {}", op.name);
            self.check_operator(op, &mut report, &mut combined, kcs.as_ref(), ai.as_ref());
            info!("operator {} done", op.name);
            if self.cfg.global.operator_pause_seconds > 0 {
                std::thread::sleep(Duration::from_secs(self.cfg.global.operator_pause_seconds));
            }
        }

        if node_status_failed {
            warn!("node status unavailable; falling back to cluster-wide log scan");
            let mut fallback = EvidenceCollector::new(&self.cfg.scan);
            fallback.collect_all_namespaces(&self.oracle);
            let search = fallback.search_string();
            if !search.is_empty() {
                let _ = writeln!(combined, "### Namespace-Only Log Search\n{search}");
            }
        }

        if !combined.is_empty() {
            report.append_section(SectionKind::Global, "Global Context", &combined);
            if let Some(kcs) = &kcs {
                kcs.search_and_append(&mut report, &combined, "Global Context");
            }
            if let Some(ai) = &ai {
                ai.summarize_and_append(&mut report, &combined, "Global Analysis");
            }
        }

        let dir = self.report_dir(bundle, out_dir);
        report.save(&dir, &self.cfg.paths.report_filename)
    }

    /// One operator pass: degraded conditions, then log evidence, each
    /// followed by the external search/AI collaborators.
    fn check_operator(
        &self,
        op: &OperatorConfig,
        report: &mut Report,
        combined: &mut String,
        kcs: Option<&KcsClient>,
        ai: Option<&AiClient>,
    ) {
        let degraded = extract_operator_degraded(&self.oracle, &op.name);
        if !degraded.is_empty() {
            let text = degraded.join("\n");
            let title = format!("Operator {} - Degraded", op.name);
            report.append_section(SectionKind::OperatorDegraded, &title, &text);
            if let Some(kcs) = kcs {
                kcs.search_and_append(report, &text, &title);
            }
            if let Some(ai) = ai {
                ai.summarize_and_append(report, &text, &title);
            }
            let _ = writeln!(combined, "### Operator {} Degraded\n{text}", op.name);
        }

        let mut collector = EvidenceCollector::new(&self.cfg.scan);
        collector.collect_sources(&self.oracle, report, &op.sources);
        let search = collector.search_string();
        if !search.is_empty() {
            let title = format!("Operator {} - Logs", op.name);
            report.append_section(SectionKind::OperatorLogs, &title, &search);
            if let Some(kcs) = kcs {
                kcs.search_and_append(report, &search, &title);
            }
            if let Some(ai) = ai {
                ai.summarize_and_append(report, &search, &title);
            }
            let _ = writeln!(combined, "### Operator {} Logs\n{search}", op.name);
        }
    }

    fn selected_operators(&self, only: Option<&str>) -> Result<Vec<&OperatorConfig>> {
        match only {
            None => Ok(self.cfg.operators.iter().collect()),
            Some(name) => {
                let picked: Vec<&OperatorConfig> = self
                    .cfg
                    .operators
                    .iter()
                    .filter(|op| op.name == name)
                    .collect();
                if picked.is_empty() {
                    return Err(anyhow!("operator not configured: {name}"));
                }
                Ok(picked)
            }
        }
    }

    fn report_dir(&self, bundle: &Path, out_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = out_dir {
            return dir.to_path_buf();
        }
        if !self.cfg.paths.report_dir.is_empty() {
            return PathBuf::from(&self.cfg.paths.report_dir);
        }
        bundle.to_path_buf()
    }
}
