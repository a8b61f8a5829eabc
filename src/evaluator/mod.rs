//! Evaluation module
//!
//! Handles the evaluation lifecycle:
//! - Building one task per persona for a decision
//! - Running the personas in a fixed order against the shared client
//! - Degrading failed calls to placeholders
//! - Reporting progress to a sink

mod runner;
mod state;

pub use runner::*;
pub use state::*;
