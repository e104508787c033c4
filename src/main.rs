//! archpkg - main entry point
//!
//! Parses the command line, sets up logging and signal handling, then either
//! runs the interactive session or one of the catalog subcommands.

use anyhow::{Context, Result};
use archpkg::catalog::{locate_catalog, Catalog};
use archpkg::cli::{Cli, Commands};
use archpkg::{process_guard, sanity, Session, SessionEnd, Settings, SystemRunner, TerminalDialog};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing; `RUST_LOG` overrides the default level
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            // Keep stderr quiet so log lines do not tear the dialogs
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_catalog(explicit: Option<&Path>) -> Result<(PathBuf, Catalog)> {
    let path = locate_catalog(explicit)?;
    let catalog = Catalog::load_from_file(&path)?;
    Ok((path, catalog))
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_file.as_deref())?;
    info!("archpkg {} starting up", env!("CARGO_PKG_VERSION"));

    // Terminate running installer commands if we receive SIGINT/SIGTERM
    if let Err(e) = process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }
    debug!("Signal handlers initialized");

    match cli.command.clone().unwrap_or(Commands::Run) {
        Commands::Validate { catalog } => validate(catalog.as_deref().or(cli.catalog.as_deref())),
        Commands::List { catalog } => list(catalog.as_deref().or(cli.catalog.as_deref())),
        Commands::Run => run_session(&cli),
    }
}

fn validate(path: Option<&Path>) -> Result<()> {
    match load_catalog(path) {
        Ok((path, catalog)) => {
            println!(
                "✓ Catalog is valid: {} ({} categories, {} entries)",
                path.display(),
                catalog.len(),
                catalog.entry_count()
            );
            let shared = catalog.shared_ids();
            if !shared.is_empty() {
                println!("  shared across categories: {}", shared.join(" "));
            }
            Ok(())
        }
        Err(e) => {
            error!("Catalog validation failed: {:#}", e);
            eprintln!("✗ Catalog validation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn list(path: Option<&Path>) -> Result<()> {
    let (_, catalog) = load_catalog(path)?;
    for category in catalog.categories() {
        println!("{} [{}] - {}", category.id, category.backend, category.description);
        for entry in &category.entries {
            println!("    {:<32} {}", entry.id, entry.description);
        }
    }
    Ok(())
}

fn run_session(cli: &Cli) -> Result<()> {
    let (path, catalog) = match load_catalog(cli.catalog.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Cannot start: {:#}", e);
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };
    info!("Using catalog {}", path.display());

    let settings = Settings::resolve(&catalog, cli.no_preselect, cli.dry_run);
    let runner = SystemRunner::new(settings.dry_run);

    if let Err(e) = sanity::run_preflight_checks(&runner, settings.dry_run) {
        error!("Pre-flight check failed: {}", e);
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }

    let mut dialog = TerminalDialog::new();
    let end = Session::new(&catalog, settings, &mut dialog, &runner)
        .run()
        .context("Session aborted")?;

    match end {
        SessionEnd::Quit => println!("No changes made."),
        SessionEnd::Finished => println!("✓ Installation finished."),
        SessionEnd::Reboot => println!("Rebooting..."),
    }
    Ok(())
}
