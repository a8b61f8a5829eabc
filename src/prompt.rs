//! Prompt rendering
//!
//! Pure text functions: the scenario brief shown to the intern, the per-persona
//! task descriptions and the mentor's composite prompt. Output is fully
//! determined by the inputs.

use std::fmt::Write;

use crate::persona::PersonaKind;
use crate::scenario::DayScenario;

/// Render an amount with at least one decimal place: `500.0`, `450.5`.
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Human-readable summary of one day.
///
/// ```text
/// Scenario: {title}
///
/// Warehouse request:
/// - {item}: {qty}
///
/// Finance budget: USD {budget}
///
/// Supplier options:
/// - {name}: {item} ${price}, ... | Delivery {delivery} | {note}
///
/// Special event: {event}
/// ```
///
/// The special-event block is omitted when the day has none.
pub fn render_brief(scenario: &DayScenario) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Scenario: {}", scenario.title);
    out.push_str("\nWarehouse request:\n");
    for line in &scenario.request {
        let _ = writeln!(out, "- {}: {}", line.item, line.quantity);
    }

    let _ = writeln!(out, "\nFinance budget: USD {}", format_amount(scenario.budget));

    out.push_str("\nSupplier options:");
    for supplier in &scenario.suppliers {
        let prices = supplier
            .prices
            .iter()
            .map(|p| format!("{} ${:.2}", p.item, p.unit_price))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            out,
            "\n- {}: {} | Delivery {} | {}",
            supplier.name, prices, supplier.delivery, supplier.reliability_note
        );
    }

    if let Some(event) = scenario.special_event() {
        let _ = write!(out, "\n\nSpecial event: {}", event);
    }

    out
}

/// Composite prompt for the mentor: decision, brief as context, and the
/// requested feedback structure.
pub fn render_mentor_prompt(decision: &str, scenario: &DayScenario) -> String {
    format!(
        "You are the Mentor evaluating a procurement intern's decision.\n\
         Intern decision:\n{}\n\n\
         Context:\n{}\n\n\
         Provide: (1) 2–3 bullet strengths, (2) 2–3 bullet improvements, \
         (3) risk/compliance notes, (4) a score /10. Keep it under 80 words.",
        decision,
        render_brief(scenario)
    )
}

/// Task description sent to one persona.
pub fn task_description(kind: PersonaKind, decision: &str, scenario: &DayScenario) -> String {
    match kind {
        PersonaKind::Finance => format!(
            "Evaluate the intern's proposed order for budget fit and cash flow impact.\n\
             Intern decision: {}",
            decision
        ),
        PersonaKind::Warehouse => format!(
            "Assess how the decision meets operational needs.\nIntern decision: {}",
            decision
        ),
        PersonaKind::Supplier => format!(
            "Respond as supplier(s) with quote confirmation.\nIntern decision: {}",
            decision
        ),
        PersonaKind::Logistics => format!(
            "Propose delivery plan and flag delays.\nIntern decision: {}\nSpecial event: {}",
            decision,
            scenario.special_event().unwrap_or_default()
        ),
        PersonaKind::Legal => format!("Check for compliance risks.\nIntern decision: {}", decision),
        PersonaKind::Mentor => render_mentor_prompt(decision, scenario),
    }
}

/// What a good answer from this persona looks like.
pub fn expected_output(kind: PersonaKind) -> &'static str {
    match kind {
        PersonaKind::Finance => "Approval status with concise rationale.",
        PersonaKind::Warehouse => "Operational assessment bullets.",
        PersonaKind::Supplier => "Supplier response with terms & caveats.",
        PersonaKind::Logistics => "Delivery plan with ETA and risks.",
        PersonaKind::Legal => "Compliance notes and recommendations.",
        PersonaKind::Mentor => "Mentor feedback with score /10.",
    }
}

/// Append earlier personas' feedback to a task description.
pub fn with_team_feedback(description: String, feedback: &[(PersonaKind, &str)]) -> String {
    if feedback.is_empty() {
        return description;
    }

    let mut out = description;
    out.push_str("\n\nTeam feedback so far:");
    for (kind, text) in feedback {
        let _ = write!(out, "\n- {}: {}", kind.role(), text.trim());
    }
    out
}
