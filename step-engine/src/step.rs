//! Plan steps, per-step outcomes, and the per-question execution context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use step_primitives::ToolCategory;
use step_tools::ToolArgs;

/// One unit of a question-decomposition plan, optionally backed by a tool
/// invocation.
///
/// The serde shape is the planner-facing wire contract and is kept
/// unchanged: `step`, `requires_tool`, `tool_name`, `tool_params`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "step")]
    description: String,
    requires_tool: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_params: Option<ToolArgs>,
}

impl Step {
    /// Creates a reasoning-only step; its content is produced entirely by
    /// the synthesizer.
    #[must_use]
    pub fn reasoning(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            requires_tool: false,
            tool_name: None,
            tool_params: None,
        }
    }

    /// Creates a tool-backed step.
    #[must_use]
    pub fn tool_call(
        description: impl Into<String>,
        tool_name: impl Into<String>,
        tool_params: ToolArgs,
    ) -> Self {
        Self {
            description: description.into(),
            requires_tool: true,
            tool_name: Some(tool_name.into()),
            tool_params: Some(tool_params),
        }
    }

    /// Returns the free-text description, including any failure
    /// annotations the executor has applied.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` when the step calls for a tool.
    #[must_use]
    pub const fn requires_tool(&self) -> bool {
        self.requires_tool
    }

    /// Returns the named tool, if any.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Returns the raw parameter mapping, if any, magic keys included.
    #[must_use]
    pub fn tool_params(&self) -> Option<&ToolArgs> {
        self.tool_params.as_ref()
    }

    /// Prefixes the description with a failure marker, preserving the
    /// original text.
    pub(crate) fn annotate_prefix(&mut self, marker: &str) {
        self.description = format!("{marker} {}", self.description);
    }

    /// Rewrites the description for an unavailable operation.
    pub(crate) fn annotate_missing_operation(&mut self, operation: &str) {
        self.description = format!("[Function not available] {operation} in {}", self.description);
    }

    /// Appends an error message to the description.
    pub(crate) fn annotate_error(&mut self, message: &str) {
        self.description = format!("[Error] {}: {message}", self.description);
    }
}

/// Snapshot of the tool metadata actually used by a step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolUseRecord {
    /// Registered tool name.
    pub tool: String,
    /// Tool description from its cached descriptor.
    pub description: String,
    /// Tool category tag.
    pub category: ToolCategory,
    /// Operation that was invoked (after `function_name` defaulting).
    pub operation: String,
    /// The step's original parameter mapping, magic keys included.
    pub parameters: ToolArgs,
}

/// Outcome of one executed step; appended to the context and never mutated
/// afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepResult {
    step: Step,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_use: Option<ToolUseRecord>,
    result: Option<Value>,
}

impl StepResult {
    /// Creates a step outcome record.
    #[must_use]
    pub fn new(step: Step, tool_use: Option<ToolUseRecord>, result: Option<Value>) -> Self {
        Self {
            step,
            tool_use,
            result,
        }
    }

    /// Returns the step as executed, annotations included.
    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Returns the tool-use snapshot when a registered tool was named.
    #[must_use]
    pub fn tool_use(&self) -> Option<&ToolUseRecord> {
        self.tool_use.as_ref()
    }

    /// Returns the raw result value; `None` is the absent marker.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }
}

/// Append-only ordered log of step outcomes for one question.
///
/// Later steps reference earlier results by zero-based index. Each question
/// owns its context exclusively; contexts are never shared across runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExecutionContext {
    results: Vec<StepResult>,
}

impl ExecutionContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step outcome.
    pub fn push(&mut self, result: StepResult) {
        self.results.push(result);
    }

    /// Returns the outcome at the supplied index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StepResult> {
        self.results.get(index)
    }

    /// Returns the result value at the supplied index, when present.
    #[must_use]
    pub fn result_at(&self, index: usize) -> Option<&Value> {
        self.results.get(index).and_then(StepResult::result)
    }

    /// Returns the number of recorded outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` when no outcome has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over recorded outcomes in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &StepResult> {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_planner_wire_shape() {
        let step: Step = serde_json::from_value(json!({
            "step": "Fetch current price for AAPL stock",
            "requires_tool": true,
            "tool_name": "StockPriceTool",
            "tool_params": {"symbol": "AAPL"}
        }))
        .unwrap();

        assert_eq!(step.description(), "Fetch current price for AAPL stock");
        assert!(step.requires_tool());
        assert_eq!(step.tool_name(), Some("StockPriceTool"));
        assert_eq!(step.tool_params().unwrap()["symbol"], json!("AAPL"));
    }

    #[test]
    fn tolerates_null_tool_fields() {
        let step: Step = serde_json::from_value(json!({
            "step": "Analyze price implications",
            "requires_tool": false,
            "tool_name": null,
            "tool_params": null
        }))
        .unwrap();

        assert!(!step.requires_tool());
        assert!(step.tool_name().is_none());
        assert!(step.tool_params().is_none());
    }

    #[test]
    fn annotations_preserve_original_text() {
        let mut step = Step::tool_call("Fetch price", "Missing", ToolArgs::new());
        step.annotate_prefix("[Tool not available]");
        assert_eq!(step.description(), "[Tool not available] Fetch price");

        let mut step = Step::tool_call("Fetch price", "StockPriceTool", ToolArgs::new());
        step.annotate_error("boom");
        assert_eq!(step.description(), "[Error] Fetch price: boom");

        let mut step = Step::tool_call("Fetch price", "StockPriceTool", ToolArgs::new());
        step.annotate_missing_operation("refresh");
        assert_eq!(
            step.description(),
            "[Function not available] refresh in Fetch price"
        );
    }

    #[test]
    fn context_indexes_results() {
        let mut context = ExecutionContext::new();
        context.push(StepResult::new(
            Step::reasoning("think"),
            None,
            Some(json!(150.25)),
        ));

        assert_eq!(context.len(), 1);
        assert_eq!(context.result_at(0), Some(&json!(150.25)));
        assert!(context.result_at(1).is_none());
    }
}
