use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::{Term, style};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// targen - Synthesize project targets from a declarative targets file
#[derive(Parser)]
#[command(name = "targen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materialize declared targets into the project file
    Regenerate {
        /// Path to the declarative targets file
        #[arg(default_value = "targets.yml")]
        targets: PathBuf,

        /// Path to the generated project file
        #[arg(default_value = "project.yml")]
        project: PathBuf,
    },

    /// Add a dependency to every declared target
    AddDependency {
        /// Name of the package or target to depend on
        name: String,

        /// Path to the declarative targets file
        #[arg(default_value = "targets.yml")]
        targets: PathBuf,

        /// Path to the generated project file
        #[arg(default_value = "project.yml")]
        project: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --verbose surfaces the core's warnings and
    // the commands it executes.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Regenerate { targets, project } => cmd_regenerate(&targets, &project),
        Commands::AddDependency {
            name,
            targets,
            project,
        } => cmd_add_dependency(&name, &targets, &project),
    }
}

fn cmd_regenerate(targets: &Path, project: &Path) -> Result<()> {
    let term = Term::stderr();
    ensure_exists(&term, targets)?;
    ensure_exists(&term, project)?;

    info!(
        targets = %targets.display(),
        project = %project.display(),
        "regenerating project targets"
    );

    term.write_line(&format!(
        "{} Regenerating {} from {}",
        style("::").cyan().bold(),
        project.display(),
        targets.display()
    ))?;

    let outcome = match targen_core::regenerate(targets, project) {
        Ok(outcome) => outcome,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
            std::process::exit(1);
        }
    };

    debug!(count = outcome.new_targets.len(), "regeneration finished");

    if outcome.is_noop() {
        term.write_line(&format!(
            "{} All declared targets already materialized",
            style("::").cyan().bold()
        ))?;
        return Ok(());
    }

    for name in &outcome.new_targets {
        term.write_line(&format!("  {} {}", style("+").green().bold(), name))?;
    }
    term.write_line(&format!(
        "{} Materialized {} target(s)",
        style("::").green().bold(),
        outcome.new_targets.len()
    ))?;

    Ok(())
}

fn cmd_add_dependency(name: &str, targets: &Path, project: &Path) -> Result<()> {
    let term = Term::stderr();
    ensure_exists(&term, targets)?;
    ensure_exists(&term, project)?;

    info!(dependency = name, "adding dependency to declared targets");

    if let Err(e) = targen_core::add_dependency(name, targets, project) {
        term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
        std::process::exit(1);
    }

    term.write_line(&format!(
        "{} Added dependency {} to declared targets",
        style("::").green().bold(),
        style(name).bold()
    ))?;

    Ok(())
}

fn ensure_exists(term: &Term, path: &Path) -> Result<()> {
    if !path.exists() {
        term.write_line(&format!(
            "{} File not found: {}",
            style("error:").red().bold(),
            path.display()
        ))?;
        std::process::exit(1);
    }
    Ok(())
}
