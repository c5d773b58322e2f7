//! External collaborator seams: the planner that decomposes a question
//! into steps and the synthesizer that turns accumulated outcomes into an
//! answer.

use async_trait::async_trait;
use thiserror::Error;

use step_tools::CapabilityCatalog;

use crate::step::{ExecutionContext, Step};

/// Errors surfaced by planner implementations. All are fatal for the
/// current question; no partial plan is synthesized.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The planner's output could not be parsed into steps.
    #[error("malformed plan: {reason}")]
    Malformed {
        /// Human-readable parse failure context.
        reason: String,
    },

    /// The underlying provider failed before producing output.
    #[error("planner provider error: {reason}")]
    Provider {
        /// Human-readable provider failure context.
        reason: String,
    },
}

impl PlanError {
    /// Creates a malformed-plan error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Creates a provider error.
    #[must_use]
    pub fn provider(reason: impl Into<String>) -> Self {
        Self::Provider {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by synthesizer implementations.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The underlying provider failed to produce an answer.
    #[error("synthesizer provider error: {reason}")]
    Provider {
        /// Human-readable provider failure context.
        reason: String,
    },
}

impl SynthesisError {
    /// Creates a provider error.
    #[must_use]
    pub fn provider(reason: impl Into<String>) -> Self {
        Self::Provider {
            reason: reason.into(),
        }
    }
}

/// Decomposes a question into an ordered step sequence, given the current
/// capability catalog.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Returns the plan for the supplied question.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] when the provider fails or its output cannot
    /// be parsed into steps.
    async fn plan(&self, question: &str, catalog: &CapabilityCatalog) -> Result<Vec<Step>, PlanError>;
}

/// Produces the final natural-language answer from the accumulated step
/// outcomes.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Returns the answer text; the runner passes it through verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] when the provider fails.
    async fn synthesize(
        &self,
        question: &str,
        context: &ExecutionContext,
    ) -> Result<String, SynthesisError>;
}
