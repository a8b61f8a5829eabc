//! Evaluation state: per-persona outcomes, the run report and the events
//! a presentation layer receives while a run is in progress.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::persona::PersonaKind;

// ─────────────────────────────────────────────────────────────────
// Context Sharing
// ─────────────────────────────────────────────────────────────────

/// Which personas see the feedback given before them in the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSharing {
    /// Every prompt is built from the scenario and the decision only
    #[default]
    None,
    /// The mentor also sees the other personas' feedback
    Mentor,
    /// Every persona sees all feedback given before it
    All,
}

impl ContextSharing {
    /// Whether `kind` receives earlier feedback under this mode
    pub fn shares_with(&self, kind: PersonaKind) -> bool {
        match self {
            ContextSharing::None => false,
            ContextSharing::Mentor => kind == PersonaKind::Mentor,
            ContextSharing::All => true,
        }
    }
}

impl fmt::Display for ContextSharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContextSharing::None => "none",
            ContextSharing::Mentor => "mentor",
            ContextSharing::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ContextSharing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(ContextSharing::None),
            "mentor" => Ok(ContextSharing::Mentor),
            "all" => Ok(ContextSharing::All),
            _ => Err(format!(
                "Invalid context sharing mode '{}'. Must be one of: none, mentor, all",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Task & Outcome
// ─────────────────────────────────────────────────────────────────

/// One unit of work: a persona, its task text and the expected answer shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTask {
    pub kind: PersonaKind,
    pub description: String,
    pub expected_output: &'static str,
}

/// How a persona's call ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Completed,
    Failed { reason: String },
}

/// One persona's feedback for the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaOutcome {
    pub kind: PersonaKind,
    pub role: &'static str,
    /// Model reply, or the placeholder when the call failed
    pub text: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    pub elapsed_ms: u64,
}

impl PersonaOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────────────────────────

/// All feedback for one decision, in run order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub day: u32,
    pub scenario: String,
    pub decision: String,
    pub context_sharing: ContextSharing,
    pub outcomes: Vec<PersonaOutcome>,
}

impl EvaluationReport {
    /// Outcome for one persona
    pub fn get(&self, kind: PersonaKind) -> Option<&PersonaOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }

    /// Every output joined by newlines, in run order
    pub fn summary(&self) -> String {
        self.outcomes
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

// ─────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────

/// Progress notifications, delivered in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationEvent {
    /// A persona's call is about to be made
    Started { kind: PersonaKind },
    /// A persona's call ended (successfully or with a placeholder)
    Finished(PersonaOutcome),
    /// The run is over
    Completed(EvaluationReport),
}

/// Receives evaluation events.
pub trait EventSink {
    fn emit(&mut self, event: EvaluationEvent);
}

impl EventSink for Vec<EvaluationEvent> {
    fn emit(&mut self, event: EvaluationEvent) {
        self.push(event);
    }
}
