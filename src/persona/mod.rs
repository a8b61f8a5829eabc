//! Persona system: the office roles that review an intern's decision.
//!
//! Each persona carries a role, a goal and a backstory, and is bound to the
//! single model client configured for the run.

pub mod registry;
pub mod types;

pub use registry::PersonaRegistry;
pub use types::{Persona, PersonaKind};
