//! Persona registry: one factory per office role, all sharing one client.
//!
//! Building a persona is pure data binding: no request is made until the
//! evaluator runs it, so an unreachable endpoint only shows up then.

use crate::backend::SharedBackend;

use super::types::{Persona, PersonaKind};

pub fn build_mentor(backend: &SharedBackend) -> Persona {
    Persona::new(PersonaKind::Mentor, backend.clone())
}

pub fn build_finance(backend: &SharedBackend) -> Persona {
    Persona::new(PersonaKind::Finance, backend.clone())
}

pub fn build_warehouse(backend: &SharedBackend) -> Persona {
    Persona::new(PersonaKind::Warehouse, backend.clone())
}

pub fn build_supplier(backend: &SharedBackend) -> Persona {
    Persona::new(PersonaKind::Supplier, backend.clone())
}

pub fn build_logistics(backend: &SharedBackend) -> Persona {
    Persona::new(PersonaKind::Logistics, backend.clone())
}

pub fn build_legal(backend: &SharedBackend) -> Persona {
    Persona::new(PersonaKind::Legal, backend.clone())
}

/// Builds personas against a shared model client.
pub struct PersonaRegistry {
    backend: SharedBackend,
}

impl PersonaRegistry {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Build one persona.
    pub fn build(&self, kind: PersonaKind) -> Persona {
        match kind {
            PersonaKind::Finance => build_finance(&self.backend),
            PersonaKind::Warehouse => build_warehouse(&self.backend),
            PersonaKind::Supplier => build_supplier(&self.backend),
            PersonaKind::Logistics => build_logistics(&self.backend),
            PersonaKind::Legal => build_legal(&self.backend),
            PersonaKind::Mentor => build_mentor(&self.backend),
        }
    }

    /// Fresh personas for one run, in evaluation order.
    pub fn roster(&self) -> Vec<Persona> {
        PersonaKind::all().iter().map(|k| self.build(*k)).collect()
    }
}
