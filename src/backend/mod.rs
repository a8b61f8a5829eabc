//! Backend module for model completions
//!
//! This module provides the core abstraction for language-model clients
//! and implementations for an OpenAI-compatible endpoint and an offline mock.

mod mock;
mod openai;
mod registry;
mod traits;

pub use mock::MockBackend;
#[cfg(test)]
pub use mock::MockConfig;
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use registry::*;
pub use traits::*;
