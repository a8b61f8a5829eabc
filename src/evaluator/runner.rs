//! Evaluation runner
//!
//! Runs the six personas strictly one after another against a decision.
//! A failing call never aborts the run: the persona's slot gets a
//! placeholder and the next persona starts.

use std::time::Instant;

use tracing::{info, warn};

use crate::backend::CompletionRequest;
use crate::error::{Error, Result};
use crate::persona::{Persona, PersonaKind, PersonaRegistry};
use crate::prompt;
use crate::scenario::DayScenario;

use super::{
    ContextSharing, EvaluationEvent, EvaluationReport, EvaluationTask, EventSink, OutcomeStatus,
    PersonaOutcome,
};

/// Prefix of the text that stands in for a failed persona
pub const UNAVAILABLE_PREFIX: &str = "Evaluation unavailable";

// ─────────────────────────────────────────────────────────────────
// Evaluator
// ─────────────────────────────────────────────────────────────────

/// Runs a decision past every persona.
pub struct Evaluator {
    registry: PersonaRegistry,
    sharing: ContextSharing,
}

impl Evaluator {
    pub fn new(registry: PersonaRegistry, sharing: ContextSharing) -> Self {
        Self { registry, sharing }
    }

    /// One task per persona, in evaluation order, without shared feedback.
    pub fn plan(&self, scenario: &DayScenario, decision: &str) -> Vec<EvaluationTask> {
        PersonaKind::all()
            .iter()
            .map(|&kind| EvaluationTask {
                kind,
                description: prompt::task_description(kind, decision, scenario),
                expected_output: prompt::expected_output(kind),
            })
            .collect()
    }

    /// Evaluate a decision against a scenario.
    ///
    /// A blank decision is rejected before any model call and before any
    /// event is emitted.
    pub async fn evaluate(
        &self,
        scenario: &DayScenario,
        decision: &str,
        sink: &mut dyn EventSink,
    ) -> Result<EvaluationReport> {
        if decision.trim().is_empty() {
            return Err(Error::invalid_input("Please enter a decision."));
        }

        info!(
            day = scenario.day,
            scenario = %scenario.title,
            sharing = %self.sharing,
            "Starting evaluation"
        );

        let roster = self.registry.roster();
        let tasks = self.plan(scenario, decision);
        let mut outcomes: Vec<PersonaOutcome> = Vec::with_capacity(tasks.len());

        for (persona, task) in roster.iter().zip(tasks) {
            sink.emit(EvaluationEvent::Started { kind: task.kind });

            let description = if self.sharing.shares_with(task.kind) {
                let feedback: Vec<(PersonaKind, &str)> = outcomes
                    .iter()
                    .filter(|o| !o.is_failed())
                    .map(|o| (o.kind, o.text.as_str()))
                    .collect();
                prompt::with_team_feedback(task.description, &feedback)
            } else {
                task.description
            };

            let outcome = run_persona(persona, description, task.expected_output).await;
            sink.emit(EvaluationEvent::Finished(outcome.clone()));
            outcomes.push(outcome);
        }

        let report = EvaluationReport {
            day: scenario.day,
            scenario: scenario.title.clone(),
            decision: decision.to_string(),
            context_sharing: self.sharing,
            outcomes,
        };

        info!(
            day = scenario.day,
            failed = report.failed_count(),
            "Evaluation finished"
        );

        sink.emit(EvaluationEvent::Completed(report.clone()));
        Ok(report)
    }
}

/// Make one persona's call, degrading any error to a placeholder outcome.
async fn run_persona(persona: &Persona, prompt: String, expected_output: &str) -> PersonaOutcome {
    let kind = persona.kind;
    let start = Instant::now();

    info!(persona = kind.slug(), role = persona.profile.role, "Persona evaluating");

    let request = CompletionRequest {
        prompt,
        expected_output: expected_output.to_string(),
        system: persona.system_context(),
    };

    let (text, status) = match persona.backend().complete(&request).await {
        Ok(text) => (text, OutcomeStatus::Completed),
        Err(e) => {
            warn!(
                persona = kind.slug(),
                service = e.is_service_error(),
                error = %e.format_for_log(),
                "Persona call failed"
            );
            let reason = e.to_string();
            (
                format!("{}: {}", UNAVAILABLE_PREFIX, reason),
                OutcomeStatus::Failed { reason },
            )
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    info!(persona = kind.slug(), elapsed_ms, "Persona finished");

    PersonaOutcome {
        kind,
        role: persona.profile.role,
        text,
        status,
        elapsed_ms,
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
