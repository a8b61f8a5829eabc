use console::style;

use crate::backend::BackendHealth;
use crate::persona::PersonaKind;
use crate::prompt::{format_amount, render_brief};
use crate::scenario::{DayScenario, ScenarioCatalog};

use super::style::icon;

pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(60)).dim());
        println!();
    }

    pub fn print_scenarios_table(&self, catalog: &ScenarioCatalog) {
        println!(
            "{:<5} {:<40} {:>10}  {}",
            style("Day").bold(),
            style("Title").bold(),
            style("Budget").bold(),
            style("Event").bold()
        );
        println!("{}", style("─".repeat(70)).dim());

        for scenario in catalog.scenarios() {
            println!(
                "{:<5} {:<40} {:>10}  {}",
                scenario.day,
                scenario.title,
                format!("USD {}", format_amount(scenario.budget)),
                scenario.special_event().map(|_| "yes").unwrap_or("-")
            );
        }
    }

    pub fn print_scenario(&self, scenario: &DayScenario) {
        self.print_header(&scenario.title);
        println!("{}", render_brief(scenario));
        println!();

        println!("{}", style("Quotes for the full request:").bold());
        for quote in scenario.quotes() {
            let total = format!("USD {:.2}", quote.total);
            let status = if !quote.is_complete() {
                style(format!("missing {}", quote.unquoted.join(", "))).red()
            } else if quote.within_budget(scenario.budget) {
                style("within budget".to_string()).green()
            } else {
                style("over budget".to_string()).yellow()
            };
            println!("  {:<28} {:>12}  {}", quote.supplier, total, status);
        }
    }

    pub fn print_personas_table(&self) {
        for kind in PersonaKind::all() {
            let profile = kind.profile();
            println!(
                "{} {} {}",
                icon(*kind),
                style(profile.role).bold(),
                style(format!("({})", kind.slug())).dim()
            );
            println!("    Goal:      {}", profile.goal);
            println!("    Backstory: {}", profile.backstory);
            println!();
        }
    }

    pub fn print_health(&self, backend_name: &str, health: &BackendHealth) {
        println!("Provider: {}", backend_name);
        println!("Model:    {}", health.model);
        if health.operational {
            self.print_success("Model endpoint reachable");
        } else {
            self.print_warning(&format!(
                "Model endpoint not reachable: {}",
                health.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    pub fn print_warning(&self, message: &str) {
        println!("{} {}", style("!").yellow().bold(), message);
    }

    pub fn print_info(&self, message: &str) {
        println!("{} {}", style("→").cyan(), message);
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
