//! LLM-backed answer synthesis.

use std::sync::Arc;

use async_trait::async_trait;

use step_engine::{ExecutionContext, SynthesisError, Synthesizer};

use crate::traits::{ChatMessage, ChatModel, ChatRequest};

/// Synthesizer that asks a chat model to turn the accumulated step
/// outcomes into a natural-language answer.
pub struct LlmSynthesizer {
    model: Arc<dyn ChatModel>,
}

impl LlmSynthesizer {
    /// Creates a synthesizer over the supplied chat model.
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(
        &self,
        question: &str,
        context: &ExecutionContext,
    ) -> Result<String, SynthesisError> {
        let prompt = synthesis_prompt(question, context)?;
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .map_err(|err| SynthesisError::provider(err.to_string()))?;

        self.model
            .complete(request)
            .await
            .map_err(|err| SynthesisError::provider(err.to_string()))
    }
}

fn synthesis_prompt(
    question: &str,
    context: &ExecutionContext,
) -> Result<String, SynthesisError> {
    let results = serde_json::to_string_pretty(context)
        .map_err(|err| SynthesisError::provider(format!("failed to serialize context: {err}")))?;

    Ok(format!(
        r"You are an AI assistant tasked with generating a natural language response to a user's question based on the results of analysis steps.

Original question: {question}

Steps and results:
{results}

Analysis Instructions:
1. Analyze each step's results and their relationships:
   - Identify key data points and trends
   - Note any correlations between different steps
   - Check for any data inconsistencies or gaps
2. Synthesize the information:
   - Connect related findings across different steps
   - Draw meaningful conclusions from the combined results
3. Generate a response that:
   - Directly answers the original question
   - Supports conclusions with specific data
   - Acknowledges any limitations or uncertainties in the data

Format your response in a clear, professional, but conversational tone.
Include relevant numerical data and proper context for all findings."
    ))
}
