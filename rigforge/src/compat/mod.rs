//! Build compatibility checking.

pub mod engine;
pub mod rules;

pub use engine::{CompatibilityEngine, Diagnostic, Diagnostics};
pub use rules::Rule;
