//! Registry owning tool instances, their cached descriptors, and their
//! advertised capabilities.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use step_primitives::{Capability, CapabilitySummary, ToolDescriptor};

use crate::discovery::discover_capabilities;
use crate::tool::Tool;

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Full capability table keyed by tool name, in the planner-facing shape.
pub type CapabilityCatalog = BTreeMap<String, Vec<CapabilitySummary>>;

/// Errors raised at registration time. Both are fatal: the offending tool
/// never enters the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The tool's descriptor exposes no operations at all.
    #[error("tool `{tool}` exposes no documented operations")]
    NoOperations {
        /// Name of the offending tool.
        tool: String,
    },

    /// A tool with the same name has already been registered.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },
}

/// Outcome of capability resolution: the primary tool plus an optional
/// fallback the caller may use on its own initiative.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapabilityMatch {
    /// Name of the first registered tool matching the capability.
    pub tool: String,
    /// First of the capability's fallback tools that is itself registered.
    pub fallback: Option<String>,
}

/// One registered tool: the instance, its descriptor (computed once at
/// registration, immutable thereafter), and its capability list.
struct RegistryEntry {
    tool: Arc<dyn Tool>,
    descriptor: ToolDescriptor,
    capabilities: Vec<Capability>,
}

/// Central registry for tools and their capabilities.
///
/// Built once per agent/session via [`register`](ToolRegistry::register),
/// then shared read-only (typically behind an `Arc`) across concurrently
/// running questions. There is no unregister operation.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.tool_names().collect();
        f.debug_struct("ToolRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, caching its descriptor and discovering its
    /// capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoOperations`] when the tool's descriptor
    /// lists no operations, or [`RegistryError::DuplicateTool`] when the
    /// name is already taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> RegistryResult<()> {
        let descriptor = tool.descriptor().clone();
        let name = descriptor.name().to_owned();

        if descriptor.operations().is_empty() {
            return Err(RegistryError::NoOperations { tool: name });
        }
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool { name });
        }

        let capabilities = discover_capabilities(&descriptor);
        debug!(
            tool = %name,
            category = %descriptor.category(),
            capabilities = capabilities.len(),
            "registered tool"
        );

        self.index.insert(name, self.entries.len());
        self.entries.push(RegistryEntry {
            tool,
            descriptor,
            capabilities,
        });
        Ok(())
    }

    /// Returns the tool registered under the supplied name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.entry(name).map(|entry| Arc::clone(&entry.tool))
    }

    /// Returns the cached descriptor for the named tool.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entry(name).map(|entry| &entry.descriptor)
    }

    /// Returns the capabilities the named tool advertises.
    #[must_use]
    pub fn capabilities(&self, name: &str) -> Option<&[Capability]> {
        self.entry(name).map(|entry| entry.capabilities.as_slice())
    }

    /// Finds a tool (and fallback) for a capability.
    ///
    /// Tools are scanned in registration order; a capability matches on
    /// exact name equality and, when `required_params` is given, on the
    /// subset check — every requested parameter must be contained in the
    /// capability's required-parameter set. The first match wins; there is
    /// no scoring across multiple matching tools. The fallback, if any, is
    /// the first of the capability's fallback tools that is itself
    /// currently registered.
    ///
    /// An unknown capability yields `None`, never an error.
    #[must_use]
    pub fn find_tool_for_capability<S: AsRef<str>>(
        &self,
        capability_name: &str,
        required_params: Option<&[S]>,
    ) -> Option<CapabilityMatch> {
        for entry in &self.entries {
            for capability in &entry.capabilities {
                if capability.name() != capability_name {
                    continue;
                }
                if let Some(params) = required_params {
                    if !capability.covers(params) {
                        continue;
                    }
                }

                let fallback = capability
                    .fallback_tools()
                    .iter()
                    .find(|tool| self.index.contains_key(*tool))
                    .cloned();

                return Some(CapabilityMatch {
                    tool: entry.descriptor.name().to_owned(),
                    fallback,
                });
            }
        }
        None
    }

    /// Exports the full capability table keyed by tool name, each
    /// capability reduced to its planner-facing summary.
    #[must_use]
    pub fn capability_catalog(&self) -> CapabilityCatalog {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.descriptor.name().to_owned(),
                    entry.capabilities.iter().map(Capability::summary).collect(),
                )
            })
            .collect()
    }

    /// Returns registered tool names in registration order.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.descriptor.name())
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no tool has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.index.get(name).map(|idx| &self.entries[*idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{ToolArgs, ToolResult};
    use async_trait::async_trait;
    use serde_json::Value;
    use step_primitives::{OperationSpec, ParameterSpec, ToolCategory, TypeSpec};

    struct StaticTool {
        descriptor: ToolDescriptor,
    }

    impl StaticTool {
        fn new(descriptor: ToolDescriptor) -> Arc<dyn Tool> {
            Arc::new(Self { descriptor })
        }
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, _operation: &str, _args: ToolArgs) -> ToolResult<Value> {
            Ok(Value::Null)
        }
    }

    fn price_tool() -> Arc<dyn Tool> {
        StaticTool::new(
            ToolDescriptor::builder("StockPriceTool")
                .description("Fetches and analyzes stock market data")
                .category(ToolCategory::Finance)
                .operation(
                    OperationSpec::builder("execute")
                        .parameter(ParameterSpec::new("symbol", TypeSpec::Str))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
    }

    fn weather_tool() -> Arc<dyn Tool> {
        StaticTool::new(
            ToolDescriptor::builder("WeatherTool")
                .category(ToolCategory::Weather)
                .operation(
                    OperationSpec::builder("execute")
                        .parameter(ParameterSpec::new("location", TypeSpec::Str))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
    }

    fn cached_price_tool() -> Arc<dyn Tool> {
        StaticTool::new(
            ToolDescriptor::builder("CachedPriceTool")
                .category(ToolCategory::Finance)
                .operation(
                    OperationSpec::builder("execute")
                        .parameter(ParameterSpec::new("symbol", TypeSpec::Str))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn rejects_tool_with_no_operations() {
        let mut registry = ToolRegistry::new();
        let tool = StaticTool::new(ToolDescriptor::builder("EmptyTool").build().unwrap());

        let err = registry.register(tool).expect_err("should fail");
        assert!(matches!(err, RegistryError::NoOperations { tool } if tool == "EmptyTool"));
        assert!(registry.is_empty());
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();

        let err = registry.register(price_tool()).expect_err("duplicate should fail");
        assert!(matches!(err, RegistryError::DuplicateTool { name } if name == "StockPriceTool"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolves_price_capability_with_params() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();
        registry.register(weather_tool()).unwrap();

        let matched = registry
            .find_tool_for_capability("get_current_price", Some(["symbol"].as_slice()))
            .expect("price tool should match");
        assert_eq!(matched.tool, "StockPriceTool");
        assert_eq!(matched.fallback, None);
    }

    #[test]
    fn fallback_must_itself_be_registered() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();
        registry.register(cached_price_tool()).unwrap();

        let matched = registry
            .find_tool_for_capability("get_current_price", Some(["symbol"].as_slice()))
            .expect("match");
        assert_eq!(matched.tool, "StockPriceTool");
        // WebSearchTool is first in the fallback list but never registered.
        assert_eq!(matched.fallback.as_deref(), Some("CachedPriceTool"));
    }

    #[test]
    fn first_registered_match_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();
        registry.register(cached_price_tool()).unwrap();

        // Both tools advertise get_by_symbol; registration order decides.
        let matched = registry
            .find_tool_for_capability("get_by_symbol", Some(["symbol"].as_slice()))
            .expect("match");
        assert_eq!(matched.tool, "StockPriceTool");
    }

    #[test]
    fn subset_check_rejects_unknown_params() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();

        let matched =
            registry.find_tool_for_capability("get_current_price", Some(["symbol", "currency"].as_slice()));
        assert!(matched.is_none());
    }

    #[test]
    fn unknown_capability_is_absence_not_error() {
        let registry = ToolRegistry::new();
        assert!(registry
            .find_tool_for_capability::<&str>("get_current_price", None)
            .is_none());
    }

    #[test]
    fn catalog_keys_by_tool_name() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();
        registry.register(weather_tool()).unwrap();

        let catalog = registry.capability_catalog();
        assert_eq!(catalog.len(), 2);

        let price_caps = &catalog["StockPriceTool"];
        assert!(price_caps.iter().any(|c| c.name == "get_current_price"));

        let weather_caps = &catalog["WeatherTool"];
        assert_eq!(weather_caps.len(), 1);
        assert_eq!(weather_caps[0].name, "get_by_location");
        assert_eq!(weather_caps[0].required_params, ["location".to_owned()]);
    }

    #[test]
    fn descriptor_is_cached_at_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(price_tool()).unwrap();

        let descriptor = registry.descriptor("StockPriceTool").expect("descriptor");
        assert_eq!(descriptor.category(), ToolCategory::Finance);
        assert!(registry.descriptor("Unknown").is_none());
    }
}
