//! Procurement internship simulator
//!
//! This is the main entry point for the procurement-sim binary.
//! The intern picks a working day, states a procurement decision, and a
//! panel of office personas reviews it through a language model.

mod backend;
mod cli;
mod config;
mod error;
mod evaluator;
mod logging;
mod persona;
mod prompt;
mod render;
mod scenario;

use std::io::{ErrorKind, Read};
use std::path::Path;

use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Error as DialoguerError, Input, Select};
use tracing::{debug, error, info};

use crate::backend::create_backend;
use crate::cli::{
    Cli, Commands, ConfigSubcommand, OutputFormat, PersonaSubcommand, ScenarioSubcommand,
};
use crate::config::{ConfigOverrides, SimConfig};
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::persona::PersonaRegistry;
use crate::render::{Display, TerminalSink};
use crate::scenario::ScenarioCatalog;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let display = Display::new();

    // Writing a fresh config must not depend on the current one being valid
    if let Commands::Config {
        subcommand: ConfigSubcommand::Init { path, force },
    } = &cli.command
    {
        let written = config::init_config(path.as_deref(), *force)?;
        display.print_success(&format!("Configuration file created: {}", written.display()));
        return Ok(());
    }

    let overrides = ConfigOverrides {
        provider: cli.provider.clone(),
        model: cli.model.clone(),
        scenario_file: cli.scenarios.clone(),
        context_sharing: match &cli.command {
            Commands::Evaluate { context_sharing, .. } | Commands::Play { context_sharing } => {
                context_sharing.clone()
            }
            _ => None,
        },
    };

    let config = SimConfig::load(cli.config.as_deref(), &overrides)?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = %config.model.provider,
        model = %config.model.model,
        "Starting procurement-sim"
    );

    let result = dispatch(cli.command, &config, &display, cli.quiet);

    // Logged here so the file writer is still alive
    if let Err(ref e) = result {
        if e.is_fatal() {
            error!(error = %e.format_for_log(), "Fatal error");
        } else {
            debug!(error = %e.format_for_log(), "Command failed");
        }
    }

    result
}

fn dispatch(command: Commands, config: &SimConfig, display: &Display, quiet: bool) -> Result<()> {
    match command {
        Commands::Scenarios { subcommand } => {
            let catalog = load_catalog(config)?;
            match subcommand {
                ScenarioSubcommand::List => display.print_scenarios_table(&catalog),
                ScenarioSubcommand::Show { day } => display.print_scenario(catalog.find(&day)?),
            }
        }
        Commands::Personas {
            subcommand: PersonaSubcommand::List,
        } => display.print_personas_table(),
        Commands::Evaluate {
            day,
            decision,
            decision_file,
            format,
            ..
        } => {
            let decision = match (decision, decision_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_decision(&path)?,
                (None, None) => String::new(),
            };
            evaluate(config, display, &day, &decision, format, quiet)?;
        }
        Commands::Play { .. } => play(config, display, quiet)?,
        Commands::Check => check(config, display)?,
        Commands::Config { subcommand } => match subcommand {
            ConfigSubcommand::Show => {
                println!("{}", toml::to_string_pretty(&config.redacted())?);
            }
            ConfigSubcommand::Validate => {
                let catalog = load_catalog(config)?;
                display.print_success(&format!(
                    "Configuration is valid ({} scenarios available).",
                    catalog.len()
                ));
            }
            // Handled before the configuration is loaded
            ConfigSubcommand::Init { .. } => {}
        },
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// Setup helpers
// ─────────────────────────────────────────────────────────────────

fn load_catalog(config: &SimConfig) -> Result<ScenarioCatalog> {
    ScenarioCatalog::from_optional_path(config.simulation.scenario_file.as_deref())
}

fn build_evaluator(config: &SimConfig) -> Result<Evaluator> {
    let backend = create_backend(&config.model)?;
    Ok(Evaluator::new(
        PersonaRegistry::new(backend),
        config.context_sharing()?,
    ))
}

/// Sequential evaluation needs no more than one thread
fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))
}

/// Read a decision from a file, or from stdin when the path is "-"
fn read_decision(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    std::fs::read_to_string(path).map_err(|e| Error::IoRead {
        path: path.to_path_buf(),
        source: e,
    })
}

// ─────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────

fn evaluate(
    config: &SimConfig,
    display: &Display,
    day: &str,
    decision: &str,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let catalog = load_catalog(config)?;
    let scenario = catalog.find(day)?;
    let evaluator = build_evaluator(config)?;
    let runtime = build_runtime()?;

    match format {
        OutputFormat::Json => {
            let mut events = Vec::new();
            let report = runtime.block_on(evaluator.evaluate(scenario, decision, &mut events))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if decision.trim().is_empty() {
                return Err(Error::invalid_input("Please enter a decision."));
            }
            display.print_header(&scenario.title);
            println!("{}", prompt::render_brief(scenario));
            println!();
            let mut sink = TerminalSink::stdout(!quiet);
            runtime.block_on(evaluator.evaluate(scenario, decision, &mut sink))?;
        }
    }

    Ok(())
}

fn check(config: &SimConfig, display: &Display) -> Result<()> {
    let backend = create_backend(&config.model)?;
    let runtime = build_runtime()?;
    let health = runtime.block_on(backend.health_check())?;

    display.print_health(backend.name(), &health);

    if health.operational {
        Ok(())
    } else {
        Err(Error::service_unavailable(
            config.model.base_url.as_str(),
            health.error.unwrap_or_default(),
        ))
    }
}

fn prompt_error(err: DialoguerError) -> Error {
    Error::Internal(format!("Interactive prompt failed: {}", err))
}

/// Interactive loop: choose a day, enter a decision, read the feedback
fn play(config: &SimConfig, display: &Display, quiet: bool) -> Result<()> {
    let catalog = load_catalog(config)?;
    let evaluator = build_evaluator(config)?;
    let runtime = build_runtime()?;
    let theme = ColorfulTheme::default();

    display.print_header("Procurement Internship Simulation");
    println!(
        "You're a procurement intern at Company X and this is your first workday. \
         Your supervisor has assigned work for you to do."
    );
    println!();

    let titles: Vec<&str> = catalog.scenarios().iter().map(|s| s.title.as_str()).collect();

    loop {
        let Some(index) = Select::with_theme(&theme)
            .with_prompt("Select day")
            .items(&titles)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?
        else {
            return Ok(());
        };
        let scenario = &catalog.scenarios()[index];

        display.print_header(&scenario.title);
        println!("{}", prompt::render_brief(scenario));
        println!();

        let decision = loop {
            let text = match Input::<String>::with_theme(&theme)
                .with_prompt("Your decision (supplier, quantities, justification)")
                .allow_empty(true)
                .interact_text()
            {
                Ok(text) => text,
                Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => {
                    return Ok(())
                }
                Err(err) => return Err(prompt_error(err)),
            };

            if text.trim().is_empty() {
                display.print_warning("Please enter a decision.");
                continue;
            }
            break text;
        };

        display.print_info("The team is evaluating your decision...");
        println!();
        let mut sink = TerminalSink::stdout(!quiet);
        runtime.block_on(evaluator.evaluate(scenario, &decision, &mut sink))?;
        println!();

        let again = Confirm::with_theme(&theme)
            .with_prompt("Try another decision?")
            .default(true)
            .interact_opt()
            .map_err(prompt_error)?;
        if again != Some(true) {
            return Ok(());
        }
    }
}
