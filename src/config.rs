use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub scan: Scan,
    #[serde(default = "default_operators")]
    pub operators: Vec<OperatorConfig>,
    #[serde(default)]
    pub kcs: Kcs,
    #[serde(default)]
    pub ai: Ai,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let mut cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        if cfg.operators.is_empty() {
            cfg.operators = default_operators();
        }
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: Default::default(),
            paths: Default::default(),
            scan: Default::default(),
            operators: default_operators(),
            kcs: Default::default(),
            ai: Default::default(),
            logging: Default::default(),
            debug: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    /// Pause between operator passes, to avoid hammering the external
    /// search/AI services.
    pub operator_pause_seconds: u64,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            operator_pause_seconds: 3,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Where report.html lands. Empty means "next to the bundle".
    pub report_dir: String,
    pub report_filename: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            report_dir: "".into(),
            report_filename: "report.html".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    /// Case-insensitive substrings that mark a log line as a failure signal.
    pub keywords: Vec<String>,
    /// Lines of context kept on each side of a hit.
    pub context_radius: usize,
    /// Evidence lines longer than this are cut, not wrapped.
    pub max_line_chars: usize,
    /// Hard cap on the joined search string handed to KCS/AI.
    pub max_search_chars: usize,
}
impl Default for Scan {
    fn default() -> Self {
        Self {
            keywords: [
                "error",
                "degraded",
                "timeout",
                "fail",
                "failed",
                "crash",
                "unavailable",
                "denied",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            context_radius: 2,
            max_line_chars: 500,
            max_search_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<LogSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSource {
    pub namespace: String,
    /// Optional label selector applied when listing pods.
    #[serde(default)]
    pub pod_label: Option<String>,
    /// Optional container-name filter; unset means every container.
    #[serde(default)]
    pub container: Option<String>,
    /// Tail limit applied to fetched logs before scanning; 0 disables it.
    #[serde(default)]
    pub lines: usize,
}

fn default_operators() -> Vec<OperatorConfig> {
    let platform = [
        ("authentication", "openshift-authentication"),
        ("image-registry", "openshift-image-registry"),
        ("dns", "openshift-dns"),
        ("ingress", "openshift-ingress"),
        ("console", "openshift-console"),
    ];
    platform
        .iter()
        .map(|(name, ns)| OperatorConfig {
            name: name.to_string(),
            sources: vec![LogSource {
                namespace: ns.to_string(),
                pod_label: None,
                container: None,
                lines: 100,
            }],
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kcs {
    pub enabled: bool,
    pub base_url: String,
    pub rows: u32,
    pub timeout_seconds: u64,
    pub username_env: String,
    pub password_env: String,
}
impl Default for Kcs {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.access.redhat.com/support/search/kcs".into(),
            rows: 3,
            timeout_seconds: 30,
            username_env: "KCS_USERNAME".into(),
            password_env: "KCS_PASSWORD".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ai {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub api_key_env: String,
}
impl Default for Ai {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://granite-3-3-8b-instruct--apicast-production.apps.int.stc.ai.prod.us-east-1.aws.paas.redhat.com:443/v1/completions".into(),
            model: "ibm-granite/granite-3.3-8b-instruct".into(),
            max_tokens: 3000,
            temperature: 0.0,
            timeout_seconds: 90,
            api_key_env: "AI_AUTH_TOKEN".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            dump_effective_config: false,
        }
    }
}
