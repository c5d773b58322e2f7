//! LLM-backed question decomposition.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use step_engine::{PlanError, Planner, Step};
use step_tools::CapabilityCatalog;

use crate::traits::{ChatMessage, ChatModel, ChatRequest};

/// Planner that asks a chat model to break a question into steps.
///
/// The model sees the serialized capability catalog and must answer with a
/// JSON array of steps in the engine's wire shape. A fenced ```json block
/// around the array is tolerated; anything else fails the question with
/// [`PlanError::Malformed`].
pub struct LlmPlanner {
    model: Arc<dyn ChatModel>,
}

impl LlmPlanner {
    /// Creates a planner over the supplied chat model.
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(
        &self,
        question: &str,
        catalog: &CapabilityCatalog,
    ) -> Result<Vec<Step>, PlanError> {
        let prompt = planning_prompt(question, catalog)?;
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .map_err(|err| PlanError::provider(err.to_string()))?;

        let response = self
            .model
            .complete(request)
            .await
            .map_err(|err| PlanError::provider(err.to_string()))?;

        let steps = parse_plan(&response)?;
        debug!(steps = steps.len(), "plan parsed");
        Ok(steps)
    }
}

fn planning_prompt(question: &str, catalog: &CapabilityCatalog) -> Result<String, PlanError> {
    let tools = serde_json::to_string_pretty(catalog)
        .map_err(|err| PlanError::provider(format!("failed to serialize catalog: {err}")))?;

    Ok(format!(
        r#"You are an AI assistant that analyzes questions and breaks them down into steps. Your output must be valid JSON.

Available tools and their capabilities:
{tools}

Question: {question}

First, determine if this question actually requires any tools to answer:
- Does it need real-time data (like current stock prices)?
- Does it need external information (like news articles)?
- Could it be answered with simple reasoning alone?
- Is historical or archived data required?

If NO tools are needed, return a single step with requires_tool: false.
If tools ARE needed:
- Break down into minimal necessary steps
- Only use tools for steps that absolutely require external data
- Combine steps where possible to minimize tool usage
- Don't use tools for simple calculations or logic

Return a JSON array where each object has this structure:
{{
    "step": "description of the step",
    "requires_tool": boolean,
    "tool_name": "name of the tool if requires_tool is true, otherwise null",
    "tool_params": {{}} or null
}}

Rules:
- Default to NOT using a tool unless absolutely necessary
- Don't force tool usage just because a tool is available
- Use null for tool_name and tool_params when no tool is needed
- Ensure tool parameters exactly match the tool's requirements
- When a tool exposes several functions, select one with the "function_name" parameter
- To feed an earlier step's result into a later one, set "use_previous_results" to that step's zero-based index
- Your entire response must be a valid JSON array

Example of a question that doesn't need tools:
Question: "What is 2 + 2?"
[
    {{
        "step": "Calculate basic arithmetic",
        "requires_tool": false,
        "tool_name": null,
        "tool_params": null
    }}
]

Example of selective tool usage:
Question: "What's Tesla's stock price and what does this mean?"
[
    {{
        "step": "Fetch current Tesla stock price",
        "requires_tool": true,
        "tool_name": "StockPriceTool",
        "tool_params": {{"symbol": "TSLA"}}
    }},
    {{
        "step": "Analyze price implications",
        "requires_tool": false,
        "tool_name": null,
        "tool_params": null
    }}
]

Return ONLY the JSON array for the given question, with no additional text:"#
    ))
}

fn parse_plan(response: &str) -> Result<Vec<Step>, PlanError> {
    let payload = extract_json(response);
    serde_json::from_str(payload)
        .map_err(|err| PlanError::malformed(format!("expected a JSON array of steps: {err}")))
}

/// Returns the body of a fenced code block when present, otherwise the
/// trimmed input.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
