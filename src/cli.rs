use crate::{
    config::Config,
    oracle::{Fetched, OmcOracle},
    pipeline::Pipeline,
    scan::scan,
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "bundle-triage")]
#[command(about = "Support-bundle triage report generator (omc + log scanning + KCS/AI cross-reference)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./bundle-triage.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the external inspection tool is available.
    Doctor {},
    /// Run the keyword scanner over a local log file.
    Scan {
        #[arg(long)]
        input: PathBuf,
    },
    /// Generate a triage report from a must-gather/inspect bundle.
    Run {
        /// Bundle directory handed to the inspection tool.
        #[arg(long)]
        input: PathBuf,
        /// Where report.html lands; defaults to the bundle directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Check a single configured operator instead of all of them.
        #[arg(long)]
        operator: Option<String>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    match &args.cmd {
        Command::Doctor {} => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            doctor()
        }
        Command::Scan { input } => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            scan_file(&cfg, input)
        }
        Command::Run {
            input,
            out_dir,
            operator,
        } => run(
            &args,
            &cfg,
            input,
            out_dir.as_deref(),
            operator.as_deref(),
        ),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("bundle-triage.toml");
    if default.exists() {
        return Some(default);
    }
    // No config on disk is fine; the built-in defaults are complete.
    None
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor() -> Result<()> {
    let oracle = OmcOracle::new()?;
    let version = match oracle.version() {
        Fetched::Data(v) => Some(v.trim().to_string()),
        Fetched::Empty => None,
        Fetched::Failed(reason) => {
            return Err(anyhow!("omc is present but not runnable: {reason}"))
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "omc": oracle.binary(),
            "version": version,
            "ok": true,
        }))?
    );
    Ok(())
}

fn scan_file(cfg: &Config, input: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading log file: {}", input.display()))?;
    let matches = scan(&text, &cfg.scan.keywords, cfg.scan.context_radius);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": input,
            "matches": matches,
        }))?
    );
    Ok(())
}

fn run(
    args: &Args,
    cfg: &Config,
    input: &Path,
    out_dir: Option<&Path>,
    operator: Option<&str>,
) -> Result<()> {
    validate_input(input)?;

    let log_path = resolve_log_path(cfg, Some(input));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!("bundle {}", input.display());

    if cfg.debug.dump_effective_config {
        let raw = toml::to_string(cfg).unwrap_or_default();
        let dir = out_dir.unwrap_or(input);
        ensure_dir(dir)?;
        std::fs::write(dir.join("effective-config.toml"), raw)?;
    }

    let oracle = OmcOracle::new()?;
    let pipeline = Pipeline::new(cfg, oracle);
    let report_path = pipeline.run(input, out_dir, operator)?;

    if cfg.global.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "bundle": input,
                "report": report_path,
                "status": "ok",
            }))?
        );
    }

    Ok(())
}

fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(anyhow!("bundle path does not exist: {}", input.display()));
    }
    if !input.is_dir() {
        return Err(anyhow!(
            "bundle path is not a directory: {}",
            input.display()
        ));
    }
    Ok(())
}

fn resolve_log_path(cfg: &Config, bundle: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(bundle) = bundle {
        return Some(bundle.join("bundle-triage.log"));
    }

    Some(PathBuf::from("bundle-triage.log"))
}
