//! webprovision - main entry point
//!
//! With no arguments the tool provisions the local host using the built-in
//! defaults. Progress goes to stdout, logs go to stderr.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use webprovision::cli::{Cli, Commands};
use webprovision::logic::page::render_index_html;
use webprovision::process_guard;
use webprovision::{
    DryRunFiles, DryRunRunner, LocalFiles, ProvisionConfig, Provisioner, RunReport, SystemRunner,
    plan,
};

/// Initialize tracing; `RUST_LOG` overrides the default `info` level.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse_args();
    debug!(?cli, "CLI arguments parsed");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        dry_run,
        config: config_path,
        strict,
        command,
    } = cli;
    let effective_config = || load_config(config_path.as_deref(), strict);

    match command.unwrap_or(Commands::Run) {
        Commands::Run => provision(&effective_config()?, dry_run),
        Commands::Plan => {
            for (index, planned) in plan(&effective_config()?).iter().enumerate() {
                println!("{}. {}", index + 1, planned.step);
                for action in &planned.actions {
                    println!("    {}", action);
                }
            }
            Ok(())
        }
        Commands::Validate { file } => validate(&file),
        Commands::ShowConfig => {
            let json = serde_json::to_string_pretty(&effective_config()?)
                .context("Failed to serialize configuration")?;
            println!("{}", json);
            Ok(())
        }
        Commands::RenderPage => {
            let config = effective_config()?;
            println!(
                "{}",
                render_index_html(&config.page_heading, &config.image_name)
            );
            Ok(())
        }
    }
}

/// Load the configuration file if one was given, otherwise use the defaults.
/// `--strict` overrides the file.
fn load_config(path: Option<&Path>, strict: bool) -> Result<ProvisionConfig> {
    let mut config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ProvisionConfig::load_from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => ProvisionConfig::default(),
    };
    config.validate().context("Invalid configuration")?;
    if strict {
        config.strict = true;
    }
    Ok(config)
}

fn validate(path: &Path) -> Result<()> {
    info!("Validating configuration file: {}", path.display());
    let config = ProvisionConfig::load_from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    config.validate().context("Configuration validation failed")?;
    println!("✓ Configuration file is valid: {}", path.display());
    Ok(())
}

fn provision(config: &ProvisionConfig, dry_run: bool) -> Result<()> {
    // An interrupted install takes its process group down with it
    if let Err(e) = process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }

    let stdout = io::stdout();
    let report = if dry_run {
        info!("Dry run: host-modifying commands and file writes are skipped");
        let runner = DryRunRunner::new(SystemRunner::new());
        Provisioner::new(config, &runner, &DryRunFiles, stdout.lock()).run()
    } else {
        let runner = SystemRunner::new();
        Provisioner::new(config, &runner, &LocalFiles, stdout.lock()).run()
    }
    .context("Provisioning stopped")?;

    debug!(actions = report.actions.len(), "run complete");
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    if report.failures.is_empty() {
        return;
    }
    println!("⚠ {} command(s) failed:", report.failures.len());
    for failure in &report.failures {
        println!("  - {}: {}", failure.command, failure.reason);
    }
}
