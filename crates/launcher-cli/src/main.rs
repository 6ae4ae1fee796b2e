mod cmd;
mod output;
mod root;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "claude-launcher",
    about = "Compose a persona system prompt with its skills and launch Claude Code",
    version
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, env = "CLAUDE_LAUNCHER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON (with --list or --dry-run)
    #[arg(long, short = 'j')]
    json: bool,

    /// Compose and write the manifest and debug artifacts without launching
    #[arg(long)]
    dry_run: bool,

    /// List persona, team and model shortcuts
    #[arg(long, conflicts_with = "dry_run")]
    list: bool,

    /// Log composition progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Persona/team and model shortcuts in any order, e.g. `tdd sonn`
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = if cli.list {
        cmd::list::run(&root, cli.json)
    } else {
        cmd::launch::run(
            &root,
            &cli.tokens,
            cmd::launch::Mode {
                dry_run: cli.dry_run,
                json: cli.json,
            },
        )
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
