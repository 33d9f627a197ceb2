use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use slimset_config::{resolve_config_path, Config};
use slimset_pipeline::{Pipeline, RunOutcome};
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Publishes the newest APK Set release as a slimmed archive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to config.json (defaults to ./config.json, then the user config dir)
    #[arg(short, long, env = "SLIMSET_CONFIG")]
    pub config: Option<Utf8PathBuf>,
    #[arg(short, long)]
    pub verbose: bool,
}

/// `RUST_LOG` wins when set; otherwise INFO, or DEBUG with `--verbose`.
pub fn log_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = resolve_config_path(cli.config.as_deref())
        .context("Failed to locate configuration file")?;
    info!("Loading configuration from {}", path);
    Config::load(&path).with_context(|| format!("Failed to load configuration from {path}"))
}

/// One complete run: config, collaborators, pipeline.
pub fn execute(cli: &Cli) -> anyhow::Result<RunOutcome> {
    let config = load_config(cli)?;
    let pipeline = Pipeline::from_config(&config).context("Failed to set up pipeline")?;
    let outcome = pipeline.run().context("Run failed")?;
    info!("{}", summarize(&outcome));
    Ok(outcome)
}

pub fn summarize(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::NoRelease => "No qualifying release found; nothing to do".to_string(),
        RunOutcome::AlreadyPresent { tag, filename } => {
            format!("{filename} ({tag}) is already on the remote; nothing to do")
        }
        RunOutcome::Uploaded {
            tag,
            filename,
            bytes,
            report,
            pruned,
        } => format!(
            "Published {filename} ({tag}): {} entries kept, {} dropped, {bytes} bytes, {} old versions removed",
            report.kept.len(),
            report.dropped.len(),
            pruned.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn runs_without_arguments() {
        let cli = Cli::try_parse_from(["slimset"]).unwrap();
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_config_and_verbose() {
        let cli = Cli::try_parse_from(["slimset", "--config", "/etc/slimset.json", "-v"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(camino::Utf8Path::new("/etc/slimset.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn noop_outcomes_are_described() {
        assert!(summarize(&RunOutcome::NoRelease).contains("nothing to do"));
        let present = RunOutcome::AlreadyPresent {
            tag: "v1".into(),
            filename: "app-1.apks".into(),
        };
        assert!(summarize(&present).contains("app-1.apks"));
    }
}
