//! Presentation layer: persona styling, the streaming evaluation board and
//! the static listings printed by the CLI.

mod board;
mod display;
mod style;

pub use board::TerminalSink;
pub use display::Display;
