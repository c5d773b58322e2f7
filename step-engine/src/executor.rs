//! Per-step dispatch protocol.
//!
//! The executor resolves a step's tool and operation, binds previous
//! results into the argument map, and contains every per-step failure:
//! missing tools, missing operations, and invocation errors all surface as
//! description annotations with an absent result, never as propagated
//! errors. Tool failures never abort plan execution.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use step_tools::{ToolArgs, ToolRegistry};

use crate::step::{ExecutionContext, Step};

/// Parameter-map key referencing an earlier step's result by index.
pub(crate) const USE_PREVIOUS_RESULTS_KEY: &str = "use_previous_results";
/// Parameter-map key selecting the operation to invoke.
pub(crate) const FUNCTION_NAME_KEY: &str = "function_name";
/// Argument name under which a referenced previous result is bound.
pub(crate) const PREVIOUS_RESULT_ARG: &str = "previous_result";
/// Operation invoked when a step does not name one.
pub(crate) const DEFAULT_OPERATION: &str = "execute";

/// Internal tagged form of a step's parameter map, with the magic wire
/// keys lifted into explicit structure.
#[derive(Debug)]
struct DispatchRequest {
    operation: String,
    arguments: ToolArgs,
    previous_result_ref: Option<usize>,
}

impl DispatchRequest {
    /// Lifts the wire-shaped parameter map into a tagged request. The
    /// supplied map is a copy; the step's own mapping is never touched.
    fn from_params(mut arguments: ToolArgs) -> Self {
        let previous_result_ref = match arguments.remove(USE_PREVIOUS_RESULTS_KEY) {
            Some(value) => value.as_u64().and_then(|idx| usize::try_from(idx).ok()),
            None => None,
        };

        let operation = match arguments.remove(FUNCTION_NAME_KEY) {
            Some(Value::String(name)) => name,
            // A non-string name can never match an operation; keep its
            // rendering so the failed lookup is annotated on the step.
            Some(other) => other.to_string(),
            None => DEFAULT_OPERATION.to_owned(),
        };

        Self {
            operation,
            arguments,
            previous_result_ref,
        }
    }
}

/// Executes one step at a time against a shared, read-only tool registry.
#[derive(Clone, Debug)]
pub struct StepExecutor {
    registry: Arc<ToolRegistry>,
}

impl StepExecutor {
    /// Creates an executor over the supplied registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Executes a single step of the plan.
    ///
    /// Returns the step's raw result value, or `None` as the absent marker.
    /// The step's description may be annotated in place when the tool or
    /// operation is unavailable or the invocation fails; execution always
    /// continues to the next step.
    pub async fn execute(&self, step: &mut Step, context: &ExecutionContext) -> Option<Value> {
        if !step.requires_tool() {
            return None;
        }
        let Some(tool_name) = step.tool_name().map(str::to_owned) else {
            return None;
        };

        let Some(tool) = self.registry.get(&tool_name) else {
            warn!(tool = %tool_name, "tool not registered");
            step.annotate_prefix("[Tool not available]");
            return None;
        };

        let params = step.tool_params().cloned().unwrap_or_default();
        let mut request = DispatchRequest::from_params(params);

        if let Some(index) = request.previous_result_ref {
            if index < context.len() {
                let value = context.result_at(index).cloned().unwrap_or(Value::Null);
                request.arguments.insert(PREVIOUS_RESULT_ARG.to_owned(), value);
            } else {
                // Out-of-range references are silently discarded.
                debug!(index, "previous-result reference out of range");
            }
        }

        let Some(operation) = tool.descriptor().operation(&request.operation) else {
            warn!(tool = %tool_name, operation = %request.operation, "operation not found");
            step.annotate_missing_operation(&request.operation);
            return None;
        };

        // Never pass an argument the target does not accept.
        if !operation.accepts(PREVIOUS_RESULT_ARG) {
            request.arguments.remove(PREVIOUS_RESULT_ARG);
        }

        debug!(
            tool = %tool_name,
            operation = %request.operation,
            args = request.arguments.len(),
            "invoking tool operation"
        );

        match tool.invoke(&request.operation, request.arguments).await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(tool = %tool_name, operation = %request.operation, error = %err, "tool invocation failed");
                step.annotate_error(&err.to_string());
                None
            }
        }
    }
}
