//! Core types for the persona system.
//!
//! A persona is a fixed office role (finance officer, warehouse manager, ...)
//! that reviews the intern's decision through the shared model client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::backend::{SharedBackend, SystemContext};

// ─────────────────────────────────────────────────────────────────
// Persona Kind
// ─────────────────────────────────────────────────────────────────

/// The six office roles that review a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaKind {
    /// Checks budget fit and cash flow.
    Finance,
    /// Checks operational needs and receiving constraints.
    Warehouse,
    /// Answers as the supplier with a quote confirmation.
    Supplier,
    /// Plans delivery and flags delays.
    Logistics,
    /// Checks procurement compliance.
    Legal,
    /// Senior officer who scores the decision.
    Mentor,
}

impl PersonaKind {
    /// Slug used in CLI args, JSON output and config.
    pub fn slug(&self) -> &'static str {
        match self {
            PersonaKind::Finance => "finance",
            PersonaKind::Warehouse => "warehouse",
            PersonaKind::Supplier => "supplier",
            PersonaKind::Logistics => "logistics",
            PersonaKind::Legal => "legal",
            PersonaKind::Mentor => "mentor",
        }
    }

    /// All kinds in evaluation order. The mentor always speaks last.
    pub fn all() -> &'static [PersonaKind] {
        &[
            PersonaKind::Finance,
            PersonaKind::Warehouse,
            PersonaKind::Supplier,
            PersonaKind::Logistics,
            PersonaKind::Legal,
            PersonaKind::Mentor,
        ]
    }

    /// Static role definition for this kind.
    pub fn profile(&self) -> &'static PersonaProfile {
        match self {
            PersonaKind::Finance => &FINANCE,
            PersonaKind::Warehouse => &WAREHOUSE,
            PersonaKind::Supplier => &SUPPLIER,
            PersonaKind::Logistics => &LOGISTICS,
            PersonaKind::Legal => &LEGAL,
            PersonaKind::Mentor => &MENTOR,
        }
    }

    /// Role label, e.g. "Finance Officer".
    pub fn role(&self) -> &'static str {
        self.profile().role
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile().name)
    }
}

impl FromStr for PersonaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "finance" => Ok(PersonaKind::Finance),
            "warehouse" => Ok(PersonaKind::Warehouse),
            "supplier" => Ok(PersonaKind::Supplier),
            "logistics" => Ok(PersonaKind::Logistics),
            "legal" | "compliance" => Ok(PersonaKind::Legal),
            "mentor" => Ok(PersonaKind::Mentor),
            _ => Err(format!(
                "Unknown persona '{}'. Valid: finance, warehouse, supplier, logistics, legal, mentor",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Profile (static strings)
// ─────────────────────────────────────────────────────────────────

/// Name, role, goal and backstory of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

const MENTOR: PersonaProfile = PersonaProfile {
    name: "Mentor",
    role: "Senior Procurement Officer",
    goal: "Evaluate intern decisions and give feedback with a score out of 10.",
    backstory: "You coach interns with concise, actionable feedback.",
};

const FINANCE: PersonaProfile = PersonaProfile {
    name: "Finance",
    role: "Finance Officer",
    goal: "Assess budget fit and suggest cost-saving measures. Keep it under 100 words.",
    backstory: "Strict but fair budget manager.",
};

const WAREHOUSE: PersonaProfile = PersonaProfile {
    name: "Warehouse",
    role: "Warehouse Manager",
    goal: "Report stock urgency and receiving constraints. Keep it under 100 words.",
    backstory: "Tracks goods pragmatically.",
};

const SUPPLIER: PersonaProfile = PersonaProfile {
    name: "Supplier",
    role: "Supplier Representative",
    goal: "Quote prices and warn about risks. Keep it under 100 words.",
    backstory: "Commercially motivated supplier rep.",
};

const LOGISTICS: PersonaProfile = PersonaProfile {
    name: "Logistics",
    role: "Transport & Delivery Manager",
    goal: "Plan delivery and flag delays. Keep it under 100 words.",
    backstory: "Manages fuel and road constraints.",
};

const LEGAL: PersonaProfile = PersonaProfile {
    name: "Legal",
    role: "Compliance Officer",
    goal: "Check compliance and flag red flags. Keep it under 100 words.",
    backstory: "Enforces local procurement laws.",
};

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// A persona bound to the run's model client.
#[derive(Clone)]
pub struct Persona {
    pub kind: PersonaKind,
    pub profile: &'static PersonaProfile,
    backend: SharedBackend,
}

impl Persona {
    pub fn new(kind: PersonaKind, backend: SharedBackend) -> Self {
        Self {
            kind,
            profile: kind.profile(),
            backend,
        }
    }

    /// The model client this persona speaks through.
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Role, goal and backstory as sent to the model.
    pub fn system_context(&self) -> SystemContext {
        SystemContext {
            role: self.profile.role.to_string(),
            goal: self.profile.goal.to_string(),
            backstory: self.profile.backstory.to_string(),
        }
    }
}

impl fmt::Debug for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persona")
            .field("kind", &self.kind)
            .field("role", &self.profile.role)
            .field("backend", &self.backend.name())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_kind_slug() {
        assert_eq!(PersonaKind::Finance.slug(), "finance");
        assert_eq!(PersonaKind::Legal.slug(), "legal");
        assert_eq!(PersonaKind::Mentor.slug(), "mentor");
    }

    #[test]
    fn test_persona_kind_from_str() {
        assert_eq!("finance".parse::<PersonaKind>().unwrap(), PersonaKind::Finance);
        assert_eq!("Supplier".parse::<PersonaKind>().unwrap(), PersonaKind::Supplier);
        assert_eq!("compliance".parse::<PersonaKind>().unwrap(), PersonaKind::Legal);
        assert!("cfo".parse::<PersonaKind>().is_err());
    }

    #[test]
    fn test_evaluation_order() {
        assert_eq!(
            PersonaKind::all(),
            &[
                PersonaKind::Finance,
                PersonaKind::Warehouse,
                PersonaKind::Supplier,
                PersonaKind::Logistics,
                PersonaKind::Legal,
                PersonaKind::Mentor,
            ]
        );
    }

    #[test]
    fn test_roles_are_distinct() {
        let mut roles: Vec<&str> = PersonaKind::all().iter().map(|k| k.role()).collect();
        roles.sort();
        roles.dedup();
        assert_eq!(roles.len(), 6);
        assert_eq!(PersonaKind::Legal.role(), "Compliance Officer");
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&PersonaKind::Logistics).unwrap();
        assert_eq!(json, "\"logistics\"");
        let parsed: PersonaKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PersonaKind::Logistics);
    }
}
