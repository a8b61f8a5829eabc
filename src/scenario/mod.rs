//! Scenario catalog: the fixed working days an intern can play.
//!
//! Each scenario describes what the warehouse requested, the finance budget,
//! the supplier quotes on the table, and an optional disruption.

pub mod catalog;
pub mod types;

pub use catalog::ScenarioCatalog;
pub use types::DayScenario;
