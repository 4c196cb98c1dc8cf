//! Signal evaluation: rule table, per-timeframe aggregation, composite
//! scoring and the engine entry point.

pub mod aggregation;
pub mod decision;
pub mod engine;
pub mod rules;
pub mod scoring;
pub mod sentiment;

pub use aggregation::*;
pub use decision::*;
pub use engine::SignalEngine;
pub use rules::{RuleBook, RuleDefinition, RuleId};
pub use scoring::*;
pub use sentiment::*;
