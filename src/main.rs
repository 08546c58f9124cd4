use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typelog::{DEMO_SCRIPT, Stage, TerminalSession, TypewriterConfig, parse_duration, parse_file, parse_str};

#[derive(Parser, Debug)]
#[command(
    name = "typelog",
    about = "Play a typewriter dialogue script in the terminal",
    version
)]
struct Args {
    /// Path to the script file. Plays the built-in demo when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Per-symbol delay for parts that do not set one
    #[arg(short, long, value_parser = parse_duration, default_value = "33ms")]
    delay: Duration,

    /// Random spread applied to every symbol delay
    #[arg(short, long, value_parser = parse_duration, default_value = "0ms")]
    jitter: Duration,

    /// Write logs to this file. The screen belongs to the dialogue, so nothing
    /// is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let script = match &args.script {
        Some(path) => parse_file(path)
            .with_context(|| format!("Failed to parse script file: {}", path.display()))?,
        None => parse_str(DEMO_SCRIPT).context("Failed to parse demo script")?,
    };
    info!(blocks = script.blocks().len(), "script loaded");

    let config = TypewriterConfig {
        default_delay: args.delay,
        jitter: args.jitter,
    };
    let first = script.into_message(config)?;

    let mut terminal = TerminalSession::enter().context("Failed to set up terminal")?;
    let mut stage = Stage::new();
    stage.start_boxed(first)?;
    stage
        .run(&mut terminal)
        .await
        .context("Failed to run dialogue")?;

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
