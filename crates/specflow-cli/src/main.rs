mod cmd;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use specflow_core::{feature::Requirements, root::locate_root};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "specflow",
    about = "Scaffold numbered feature workspaces and locate their documents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect from .specify/ or .git)
    #[arg(long, global = true, env = "SPECFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a numbered feature: branch, specs directory and spec file
    Create {
        /// Free-text description of the feature
        description: Vec<String>,

        /// Use this feature number instead of the next free one
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        number: Option<u32>,

        /// Use this name instead of one derived from the description
        #[arg(long)]
        short_name: Option<String>,
    },

    /// Show the document paths of the current feature
    Paths,

    /// Verify the current feature is ready and list its available documents
    Check {
        /// Fail unless plan.md exists
        #[arg(long)]
        require_plan: bool,

        /// Fail unless tasks.md exists
        #[arg(long)]
        require_tasks: bool,

        /// Include tasks.md in the available documents
        #[arg(long)]
        include_tasks: bool,
    },

    /// Resolve a possibly malformed path to where the file really lives
    Resolve { path: String },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version requests also arrive as errors; clap prints those
        Err(e) if e.use_stderr() && json_requested() => {
            let message = e.to_string();
            let first = message.lines().next().unwrap_or_default();
            report_error(true, first.trim_start_matches("error: "));
        }
        Err(e) => e.exit(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let explicit_root = cli.root.as_deref();

    let result = match cli.command {
        Commands::Create {
            description,
            number,
            short_name,
        } => repo_root(explicit_root)
            .and_then(|root| cmd::create::run(&root, description, number, short_name, json)),
        Commands::Paths => repo_root(explicit_root).and_then(|root| cmd::paths::run(&root, json)),
        Commands::Check {
            require_plan,
            require_tasks,
            include_tasks,
        } => {
            let requirements = Requirements {
                plan: require_plan,
                tasks: require_tasks,
                include_tasks,
            };
            repo_root(explicit_root).and_then(|root| cmd::check::run(&root, requirements, json))
        }
        Commands::Resolve { path } => cmd::resolve::run(&path, json),
    };

    if let Err(e) = result {
        report_error(json, &format!("{e:#}"));
    }
}

fn report_error(json: bool, message: &str) -> ! {
    // Agents parse stdout, so JSON mode reports failure as a JSON object
    if json {
        let _ = output::print_json(&serde_json::json!({ "error": message }));
    } else {
        eprintln!("error: {message}");
    }
    std::process::exit(1);
}

/// Scan raw arguments for `--json` when clap could not parse them.
fn json_requested() -> bool {
    std::env::args_os()
        .skip(1)
        .take_while(|arg| arg != "--")
        .any(|arg| arg == "--json" || arg == "-j")
}

fn repo_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot read the current directory")?;
    Ok(locate_root(explicit, &cwd)?)
}
