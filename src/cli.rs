//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the procurement simulator.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

/// Procurement internship simulator
///
/// Pick a working day, state a procurement decision, and get feedback from
/// a panel of office personas backed by a language model.
#[derive(Parser, Debug)]
#[command(name = "procurement-sim")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "PROCSIM_CONFIG", global = true)]
    pub config: Option<String>,

    /// Model provider override (openai, mock)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model identifier override
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Scenario catalog file (replaces the bundled days)
    #[arg(long, global = true)]
    pub scenarios: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the scenario catalog
    Scenarios {
        #[command(subcommand)]
        subcommand: ScenarioSubcommand,
    },

    /// Describe the reviewing personas
    Personas {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Evaluate one decision for one day
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["decision", "decision_file"])
    ))]
    Evaluate {
        /// Day number or exact scenario title
        #[arg(short, long)]
        day: String,

        /// Decision text (supplier, quantities, justification)
        #[arg(long)]
        decision: Option<String>,

        /// Read the decision from a file ("-" for stdin)
        #[arg(long)]
        decision_file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Which personas see earlier feedback (none, mentor, all)
        #[arg(long)]
        context_sharing: Option<String>,
    },

    /// Interactive session: pick a day, type decisions, read feedback
    Play {
        /// Which personas see earlier feedback (none, mentor, all)
        #[arg(long)]
        context_sharing: Option<String>,
    },

    /// Check that the model endpoint is reachable
    Check,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Output format for evaluation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Scenario subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ScenarioSubcommand {
    /// List all days in the catalog
    List,

    /// Show one day's brief and supplier quotes
    Show {
        /// Day number or exact scenario title
        day: String,
    },
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List the personas in evaluation order
    List,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration and scenario catalog
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verifies that the CLI definition is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_about_from_doc_comment() {
        let about = Cli::command().get_about().map(|a| a.to_string());
        assert_eq!(about.as_deref(), Some("Procurement internship simulator"));
    }

    #[test]
    fn test_evaluate_command() {
        let cli = Cli::parse_from([
            "procurement-sim",
            "evaluate",
            "--day",
            "1",
            "--decision",
            "Order from SA Importers",
        ]);
        match cli.command {
            Commands::Evaluate { day, decision, decision_file, format, context_sharing } => {
                assert_eq!(day, "1");
                assert_eq!(decision.as_deref(), Some("Order from SA Importers"));
                assert!(decision_file.is_none());
                assert_eq!(format, OutputFormat::Text);
                assert!(context_sharing.is_none());
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_evaluate_requires_decision() {
        let result = Cli::try_parse_from(["procurement-sim", "evaluate", "--day", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluate_decision_sources_conflict() {
        let result = Cli::try_parse_from([
            "procurement-sim",
            "evaluate",
            "--day",
            "1",
            "--decision",
            "x",
            "--decision-file",
            "d.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluate_json_format() {
        let cli = Cli::parse_from([
            "procurement-sim",
            "evaluate",
            "-d",
            "2",
            "--decision-file",
            "-",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Evaluate { decision_file, format, .. } => {
                assert_eq!(decision_file, Some(PathBuf::from("-")));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "procurement-sim",
            "scenarios",
            "list",
            "--provider",
            "mock",
            "--model",
            "qwen2.5",
            "--scenarios",
            "days.toml",
        ]);
        assert_eq!(cli.provider.as_deref(), Some("mock"));
        assert_eq!(cli.model.as_deref(), Some("qwen2.5"));
        assert_eq!(cli.scenarios.as_deref(), Some("days.toml"));
    }

    #[test]
    fn test_scenarios_show() {
        let cli = Cli::parse_from(["procurement-sim", "scenarios", "show", "3"]);
        match cli.command {
            Commands::Scenarios { subcommand: ScenarioSubcommand::Show { day } } => {
                assert_eq!(day, "3");
            }
            _ => panic!("Expected Scenarios Show command"),
        }
    }

    #[test]
    fn test_verbose_flags() {
        let cli = Cli::parse_from(["procurement-sim", "-vv", "check"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::parse_from(["procurement-sim", "--quiet", "personas", "list"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["procurement-sim", "config", "init", "--force"]);
        match cli.command {
            Commands::Config { subcommand: ConfigSubcommand::Init { path, force } } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
