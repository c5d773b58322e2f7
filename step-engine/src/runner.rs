//! Drives a full question: plan, execute steps in order, synthesize.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use step_tools::ToolRegistry;

use crate::collaborators::{PlanError, Planner, SynthesisError, Synthesizer};
use crate::executor::{DEFAULT_OPERATION, FUNCTION_NAME_KEY, StepExecutor};
use crate::step::{ExecutionContext, Step, StepResult, ToolUseRecord};

/// Result alias for plan-runner operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal failures for one question. Per-step tool failures are contained
/// by the executor and never appear here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The planner failed or produced an unparseable plan.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The synthesizer failed to produce an answer.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Runs questions end to end against a shared tool registry.
///
/// The registry is read-only by the time a runner is built, so one runner
/// (or several) may serve many concurrent questions; each call to
/// [`answer`](PlanRunner::answer) owns its context exclusively.
pub struct PlanRunner {
    registry: Arc<ToolRegistry>,
    planner: Arc<dyn Planner>,
    synthesizer: Arc<dyn Synthesizer>,
    executor: StepExecutor,
}

impl PlanRunner {
    /// Creates a runner over the supplied registry and collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<ToolRegistry>,
        planner: Arc<dyn Planner>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        let executor = StepExecutor::new(Arc::clone(&registry));
        Self {
            registry,
            planner,
            synthesizer,
            executor,
        }
    }

    /// Answers a question: obtains a plan, executes every step strictly in
    /// order while building the context, then returns the synthesizer's
    /// output verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Plan`] when the planner fails (fatal; no
    /// context is built and no synthesis is attempted) or
    /// [`EngineError::Synthesis`] when the final stage fails.
    pub async fn answer(&self, question: &str) -> EngineResult<String> {
        let catalog = self.registry.capability_catalog();
        let steps = self.planner.plan(question, &catalog).await?;
        info!(steps = steps.len(), "plan obtained");

        let mut context = ExecutionContext::new();
        for (index, mut step) in steps.into_iter().enumerate() {
            let result = self.executor.execute(&mut step, &context).await;
            debug!(
                index,
                step = step.description(),
                has_result = result.is_some(),
                "step executed"
            );

            let tool_use = self.snapshot_tool_use(&step);
            context.push(StepResult::new(step, tool_use, result));
        }

        let answer = self.synthesizer.synthesize(question, &context).await?;
        info!(steps = context.len(), "question answered");
        Ok(answer)
    }

    /// Snapshots the metadata of the tool a step named, when that tool is
    /// registered. Parameters are the step's original mapping, magic keys
    /// included.
    fn snapshot_tool_use(&self, step: &Step) -> Option<ToolUseRecord> {
        let tool_name = step.tool_name()?;
        let descriptor = self.registry.descriptor(tool_name)?;

        let params = step.tool_params().cloned().unwrap_or_default();
        let operation = match params.get(FUNCTION_NAME_KEY) {
            Some(Value::String(name)) => name.clone(),
            _ => DEFAULT_OPERATION.to_owned(),
        };

        Some(ToolUseRecord {
            tool: descriptor.name().to_owned(),
            description: descriptor.description().to_owned(),
            category: descriptor.category(),
            operation,
            parameters: params,
        })
    }
}
