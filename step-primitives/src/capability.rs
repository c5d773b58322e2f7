//! Capability descriptors advertised by tools for discovery and fallback
//! resolution.
//!
//! A capability is a named, parameterized ability, distinct from the
//! operation actually invoked. Capability names are unique within one
//! tool's list but may repeat across tools; repeats are how fallback
//! matching works.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Describes one advertised ability of a tool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    name: String,
    description: String,
    required_params: Vec<String>,
    example_usage: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fallback_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback_strategy: Option<String>,
}

impl Capability {
    /// Starts building a capability descriptor.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder {
            name: name.into(),
            description: None,
            required_params: Vec::new(),
            example_usage: None,
            fallback_tools: Vec::new(),
            fallback_strategy: None,
        }
    }

    /// Returns the capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter names this capability requires.
    #[must_use]
    pub fn required_params(&self) -> &[String] {
        &self.required_params
    }

    /// Returns the example-usage text advertised to the planner.
    #[must_use]
    pub fn example_usage(&self) -> &str {
        &self.example_usage
    }

    /// Returns the ordered fallback tool names, if any.
    #[must_use]
    pub fn fallback_tools(&self) -> &[String] {
        &self.fallback_tools
    }

    /// Returns the fallback-strategy note, if any.
    #[must_use]
    pub fn fallback_strategy(&self) -> Option<&str> {
        self.fallback_strategy.as_deref()
    }

    /// Returns `true` when every requested parameter is contained in this
    /// capability's required-parameter set.
    ///
    /// This is a subset check, not equality: callers may ask for fewer
    /// parameters than the capability declares.
    #[must_use]
    pub fn covers<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        requested
            .iter()
            .all(|param| self.required_params.iter().any(|p| p == param.as_ref()))
    }

    /// Reduces the capability to the planner-facing summary shape.
    #[must_use]
    pub fn summary(&self) -> CapabilitySummary {
        CapabilitySummary {
            name: self.name.clone(),
            description: self.description.clone(),
            required_params: self.required_params.clone(),
            example: self.example_usage.clone(),
        }
    }
}

/// Builder for [`Capability`].
#[derive(Debug)]
pub struct CapabilityBuilder {
    name: String,
    description: Option<String>,
    required_params: Vec<String>,
    example_usage: Option<String>,
    fallback_tools: Vec<String>,
    fallback_strategy: Option<String>,
}

impl CapabilityBuilder {
    /// Sets the human-readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a required parameter name.
    #[must_use]
    pub fn require_param(mut self, param: impl Into<String>) -> Self {
        self.required_params.push(param.into());
        self
    }

    /// Sets the example-usage text.
    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example_usage = Some(example.into());
        self
    }

    /// Appends a fallback tool name; order is the resolution order.
    #[must_use]
    pub fn fallback_tool(mut self, tool: impl Into<String>) -> Self {
        self.fallback_tools.push(tool.into());
        self
    }

    /// Sets the fallback-strategy note.
    #[must_use]
    pub fn fallback_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.fallback_strategy = Some(strategy.into());
        self
    }

    /// Finalises the capability descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapability`] when the name or description is
    /// empty.
    pub fn build(self) -> Result<Capability> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_capability("name cannot be empty"));
        }

        let description = self
            .description
            .ok_or_else(|| Error::invalid_capability("description must be provided"))?;

        Ok(Capability {
            example_usage: self
                .example_usage
                .unwrap_or_else(|| format!("Use the {} capability", self.name)),
            name: self.name,
            description,
            required_params: self.required_params,
            fallback_tools: self.fallback_tools,
            fallback_strategy: self.fallback_strategy,
        })
    }
}

/// Planner-facing reduction of a capability: the only structured artifact
/// crossing the boundary to the external planner.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySummary {
    /// Capability name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Parameter names the capability requires.
    pub required_params: Vec<String>,
    /// Example-usage text.
    pub example: String,
}
