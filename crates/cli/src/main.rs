mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tagcheck")]
#[command(version, about = "Audit a music library against its folder and tag conventions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Check a music library tree and fix repairable tag violations
    Check {
        /// Top-level music folder
        path: PathBuf,

        /// Report and compute all corrections without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path, dry_run } => {
            init_logging()?;
            commands::check::run(path, dry_run)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tagcheck", &mut io::stdout());
            Ok(())
        }
    }
}

/// Console plus a timestamped log file, so a long audit leaves a record
/// that survives the terminal scrollback.
fn init_logging() -> anyhow::Result<()> {
    let file_name = format!(
        "tagcheck-{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let log_file = std::fs::File::create(&file_name)?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    Ok(())
}
