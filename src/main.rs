use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use tally::{hook, install, report, store};

#[derive(ClapParser, Debug)]
#[command(
    name = "tally",
    about = "Track Claude Code agent and slash command usage"
)]
struct Cli {
    /// Path to the usage stats file (defaults to
    /// .claude/metrics/usage-stats.toml under the project root).
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Print a usage summary instead of processing a hook event.
    #[arg(long)]
    report: bool,

    /// Register the PostToolUse hook in .claude/settings.json.
    #[arg(long)]
    install: bool,

    /// Project root for --report and --install (defaults to the current
    /// directory).
    #[arg(short, long)]
    project: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.install {
        return install::register(cli.project);
    }

    if cli.report {
        let path = cli
            .stats_file
            .unwrap_or_else(|| store::stats_path(cli.project.as_deref()));
        return report::print(&path);
    }

    // Hook mode: read one event from stdin. The host must never see a
    // failure from this path, so every error collapses to a clean exit.
    let mut raw = String::new();
    if io::stdin().read_to_string(&mut raw).is_err() {
        return Ok(());
    }

    match hook::process(&raw, cli.stats_file.as_deref()) {
        Ok(outcome) => tracing::debug!(?outcome, "hook event handled"),
        Err(err) => tracing::debug!("hook event dropped: {err:#}"),
    }

    Ok(())
}
