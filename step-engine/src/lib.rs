//! Step-plan execution engine.
//!
//! A question becomes an ordered sequence of [`Step`]s (produced by an
//! external [`Planner`]); the [`StepExecutor`] dispatches each step against
//! the tool registry while threading previous results, the [`PlanRunner`]
//! drives the loop and builds the append-only [`ExecutionContext`], and an
//! external [`Synthesizer`] turns the accumulated outcomes into the final
//! answer.

#![warn(missing_docs, clippy::pedantic)]

mod collaborators;
mod executor;
mod runner;
mod step;

pub use collaborators::{PlanError, Planner, SynthesisError, Synthesizer};
pub use executor::StepExecutor;
pub use runner::{EngineError, EngineResult, PlanRunner};
pub use step::{ExecutionContext, Step, StepResult, ToolUseRecord};
