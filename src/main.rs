mod calc;
mod cmd;
mod data;
mod ui;
mod wizard;

use clap::{Parser, Subcommand};
use data::DumpFormat;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "onboard", about = "hotel reception assistant onboarding")]
struct Cli {
    /// Path to the data directory containing config.yaml (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml
    Init,
    /// Feed a scripted list of wizard events through the wizard and print the result
    Replay {
        /// Event script (.yaml, .yml or .json)
        script: PathBuf,
        /// Dump format, overriding the config
        #[arg(long, value_enum)]
        format: Option<DumpFormat>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the user did not explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command {
        auto_init(&data_dir, &mut std::io::stderr())?;
    }

    let interactive = cli.command.is_none();
    let _guard = init_tracing(&data_dir, interactive)?;

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Replay { script, format }) => cmd::replay::run(&script, format),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The TUI owns the terminal, so interactive runs log to `onboard.log` in the
/// data directory. Everything else logs to stderr.
fn init_tracing(data_dir: &Path, interactive: bool) -> anyhow::Result<Option<WorkerGuard>> {
    if interactive {
        std::fs::create_dir_all(data_dir)?;
        let appender = tracing_appender::rolling::never(data_dir, "onboard.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        Ok(None)
    }
}

/// Initializes `data_dir` when it is missing or empty. Notices go to `log`
/// so stdout carries only the command's own output. Returns true if it ran.
fn auto_init<W: Write>(data_dir: &Path, log: &mut W) -> anyhow::Result<bool> {
    if !dir_needs_init(data_dir) {
        return Ok(false);
    }
    writeln!(
        log,
        "Data directory '{}' is missing or empty, running init...",
        data_dir.display()
    )?;
    cmd::init::init_in(data_dir, log)?;
    Ok(true)
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
