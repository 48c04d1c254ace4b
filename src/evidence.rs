use crate::config::{LogSource, Scan};
use crate::oracle::Oracle;
use crate::report::{Report, SectionKind};
use crate::scan::scan;
use crate::util::{cap_chars, strip_ansi, tail_lines};
use std::collections::HashSet;
use tracing::debug;

/// One evidence line plus where it came from (`pod/container`, or
/// `namespace/pod/container` for the cluster-wide fallback walk).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedLine {
    pub origin: String,
    pub text: String,
}

impl TaggedLine {
    pub fn render(&self) -> String {
        format!("[{}] {}", self.origin, self.text)
    }
}

/// Walks the oracle's namespace/pod/container enumeration, scans each
/// container log for failure signals, and accumulates deduplicated,
/// origin-tagged evidence for one subsystem.
pub struct EvidenceCollector<'a> {
    scan_cfg: &'a Scan,
    lines: Vec<TaggedLine>,
}

impl<'a> EvidenceCollector<'a> {
    pub fn new(scan_cfg: &'a Scan) -> Self {
        Self {
            scan_cfg,
            lines: Vec::new(),
        }
    }

    pub fn evidence(&self) -> &[TaggedLine] {
        &self.lines
    }

    /// Process a subsystem's configured log sources, streaming raw logs
    /// and scan hits into the report as they are discovered. Fetch
    /// failures are swallowed as empty data.
    pub fn collect_sources(
        &mut self,
        oracle: &dyn Oracle,
        report: &mut Report,
        sources: &[LogSource],
    ) {
        for src in sources {
            let pods = oracle
                .list_pods(&src.namespace, src.pod_label.as_deref())
                .best_effort("pod listing")
                .unwrap_or_default();
            for pod in &pods {
                report.append_section(
                    SectionKind::Other,
                    &format!("Pod: {pod} (ns:{})", src.namespace),
                    "",
                );
                let containers = oracle
                    .containers(&src.namespace, pod)
                    .best_effort("container listing")
                    .unwrap_or_default();
                for container in &containers {
                    if let Some(only) = &src.container {
                        if only != container {
                            continue;
                        }
                    }
                    let log = oracle
                        .logs(&src.namespace, pod, container)
                        .best_effort("log fetch")
                        .unwrap_or_default();
                    report.append_section(
                        SectionKind::Other,
                        &format!("Container {container} Logs"),
                        &log,
                    );
                    let scanned = if src.lines > 0 {
                        tail_lines(&log, src.lines)
                    } else {
                        log
                    };
                    for hit in scan(&scanned, &self.scan_cfg.keywords, self.scan_cfg.context_radius)
                    {
                        let text = cap_chars(&strip_ansi(&hit), self.scan_cfg.max_line_chars);
                        report.append_hit_line(&format!("[HIT] {pod}/{container}: {text}"));
                        self.lines.push(TaggedLine {
                            origin: format!("{pod}/{container}"),
                            text,
                        });
                    }
                }
            }
        }
        self.dedup();
    }

    /// Cluster-wide fallback: the same walk over every namespace the
    /// oracle knows, tagging lines `namespace/pod/container`. Used only
    /// when node-status retrieval failed; nothing is streamed into the
    /// report.
    pub fn collect_all_namespaces(&mut self, oracle: &dyn Oracle) {
        let namespaces = oracle
            .list_namespaces()
            .best_effort("namespace listing")
            .unwrap_or_default();
        for ns in &namespaces {
            debug!("fallback scan of namespace {ns}");
            let pods = oracle
                .list_pods(ns, None)
                .best_effort("pod listing")
                .unwrap_or_default();
            for pod in &pods {
                let containers = oracle
                    .containers(ns, pod)
                    .best_effort("container listing")
                    .unwrap_or_default();
                for container in &containers {
                    let log = oracle
                        .logs(ns, pod, container)
                        .best_effort("log fetch")
                        .unwrap_or_default();
                    for hit in scan(&log, &self.scan_cfg.keywords, self.scan_cfg.context_radius) {
                        let text = cap_chars(&strip_ansi(&hit), self.scan_cfg.max_line_chars);
                        self.lines.push(TaggedLine {
                            origin: format!("{ns}/{pod}/{container}"),
                            text,
                        });
                    }
                }
            }
        }
        self.dedup();
    }

    /// Join all evidence line text (tags excluded) into the single
    /// bounded string handed to the external search/AI collaborators.
    pub fn search_string(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let joined = self
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        cap_chars(&strip_ansi(&joined), self.scan_cfg.max_search_chars)
    }

    fn dedup(&mut self) {
        let mut seen = HashSet::with_capacity(self.lines.len());
        self.lines.retain(|l| seen.insert(l.clone()));
    }
}
