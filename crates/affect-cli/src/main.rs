mod display;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use affect_core::{EngineConfig, predict};
use affect_store::SessionRuntime;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser)]
#[command(name = "affect", about = "Affective state engine CLI")]
struct Cli {
    /// Override the config file path (default: <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one interaction and print the resulting directive
    Process {
        /// Interaction text
        text: String,

        /// Feedback score in [0, 1]
        #[arg(long)]
        feedback: Option<f64>,

        /// Context entries as key=value (repeatable)
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
    },

    /// Show the current emotional state
    State {
        /// Include meta-cognitive and personality sections
        #[arg(long)]
        detailed: bool,
    },

    /// Heuristic forecast of the primary emotions
    Predict {
        /// Forecast horizon in minutes
        #[arg(long, default_value_t = 30)]
        minutes: u32,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show recent interaction history
    History {
        /// Maximum entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Back up the database
    Backup {
        /// Label recorded with the backup
        #[arg(long, default_value = "manual")]
        reason: String,
    },

    /// Replace the database with a backup
    Restore {
        /// Backup file path
        path: PathBuf,
    },

    /// Delete old snapshots and interactions
    Cleanup {
        /// Retention window in days
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Reseed the emotional state with a fresh session
    Reset {
        /// Carry learning scalars and blended traits into the new session
        #[arg(long)]
        preserve_learning: bool,
    },

    /// Export the full current state as JSON
    Export {
        /// Output file path
        path: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Load config from disk. A missing file means defaults; a file that does
/// not parse or validate is fatal.
fn load_config(path: &Path) -> Result<EngineConfig> {
    let config = match fs::read_to_string(path) {
        Ok(content) => toml::from_str::<EngineConfig>(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => EngineConfig::default(),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    config
        .validate()
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}

fn parse_context(entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut context = BTreeMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("context entry '{entry}' is not key=value");
        };
        context.insert(key.to_string(), value.to_string());
    }
    Ok(context)
}

fn open_runtime(cli: &Cli) -> Result<SessionRuntime> {
    let base = affect_store::resolve_base_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| affect_store::config_path(&base));
    let config = load_config(&config_path)?;
    Ok(SessionRuntime::open(&base, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Process {
            text,
            feedback,
            context,
        } => cmd_process(&cli, text, *feedback, context),
        Commands::State { detailed } => cmd_state(&cli, *detailed),
        Commands::Predict { minutes, seed } => cmd_predict(&cli, *minutes, *seed),
        Commands::History { limit } => cmd_history(&cli, *limit),
        Commands::Backup { reason } => cmd_backup(&cli, reason),
        Commands::Restore { path } => cmd_restore(&cli, path),
        Commands::Cleanup { days } => cmd_cleanup(&cli, *days),
        Commands::Reset { preserve_learning } => cmd_reset(&cli, *preserve_learning),
        Commands::Export { path } => cmd_export(&cli, path),
    }
}

fn cmd_process(
    cli: &Cli,
    text: &str,
    feedback: Option<f64>,
    context_entries: &[String],
) -> Result<()> {
    if let Some(score) = feedback {
        if !(0.0..=1.0).contains(&score) {
            bail!("feedback must be in [0, 1], got {score}");
        }
    }
    let context = parse_context(context_entries)?;
    let mut runtime = open_runtime(cli)?;

    let outcome = runtime.process(text, &context, feedback);
    if outcome.directive.is_empty() {
        println!("(no directive)");
    } else {
        println!("{}", outcome.directive);
    }
    if let Some((p, v)) = outcome.state.dominant_primary() {
        eprintln!("dominant: {} ({v:.2})", p.as_str());
    }
    Ok(())
}

fn cmd_state(cli: &Cli, detailed: bool) -> Result<()> {
    let runtime = open_runtime(cli)?;
    let state = runtime.get_state(None);
    println!("{}", display::format_state(&state, detailed));
    Ok(())
}

fn cmd_predict(cli: &Cli, minutes: u32, seed: Option<u64>) -> Result<()> {
    let runtime = open_runtime(cli)?;
    let state = runtime.get_state(None);

    let mut rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    };
    let forecast = predict(&state, minutes, runtime.config(), &mut rng);
    println!("{}", display::format_forecast(&forecast));
    Ok(())
}

fn cmd_history(cli: &Cli, limit: usize) -> Result<()> {
    let runtime = open_runtime(cli)?;
    let records = runtime.history(limit).context("failed to read history")?;

    if records.is_empty() {
        println!("no interactions recorded");
        return Ok(());
    }
    for r in &records {
        println!(
            "[{}] {} (confidence {:.2})",
            affect_core::unix_to_iso8601(r.created_at),
            r.user_text,
            r.confidence
        );
    }
    Ok(())
}

fn cmd_backup(cli: &Cli, reason: &str) -> Result<()> {
    let runtime = open_runtime(cli)?;
    let path = runtime.backup(reason).context("backup failed")?;
    println!("backup written to {}", path.display());
    Ok(())
}

fn cmd_restore(cli: &Cli, path: &Path) -> Result<()> {
    let mut runtime = open_runtime(cli)?;
    runtime.restore(path).context("restore failed")?;
    println!("restored from {}", path.display());
    Ok(())
}

fn cmd_cleanup(cli: &Cli, days: u32) -> Result<()> {
    let runtime = open_runtime(cli)?;
    let report = runtime.cleanup(days).context("cleanup failed")?;
    println!(
        "removed {} snapshots, {} interactions (retention {days}d)",
        report.snapshots_deleted, report.interactions_deleted
    );
    Ok(())
}

fn cmd_reset(cli: &Cli, preserve_learning: bool) -> Result<()> {
    let mut runtime = open_runtime(cli)?;
    let state = runtime.reset(preserve_learning);
    println!("state reset, new session {}", state.session_id);
    Ok(())
}

fn cmd_export(cli: &Cli, path: &Path) -> Result<()> {
    let runtime = open_runtime(cli)?;
    let state = runtime.get_state(None);

    let json = serde_json::to_string_pretty(&state).context("failed to serialize state")?;
    fs::write(path, &json).with_context(|| format!("failed to write {}", path.display()))?;

    println!("exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_entries() {
        let ctx = parse_context(&["task_outcome=success".to_string(), "k=v".to_string()]).unwrap();
        assert_eq!(ctx.get("task_outcome").map(String::as_str), Some("success"));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_parse_context_rejects_bare_key() {
        assert!(parse_context(&["no-equals".to_string()]).is_err());
    }

    #[test]
    fn test_load_config_missing_is_default() {
        let config = load_config(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_config_invalid_value_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "decay_rate = 7.0\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_load_config_parse_error_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "decay_rate = \"not a number\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
