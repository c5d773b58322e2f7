//! Tool trait, registry, and capability resolution for the stepwise agent
//! engine.
//!
//! Tools are registered once while the registry is being assembled; after
//! that the registry is shared read-only (typically behind an `Arc`) across
//! every in-flight question.

#![warn(missing_docs, clippy::pedantic)]

mod discovery;
pub mod registry;
pub mod tool;

pub use registry::{CapabilityCatalog, CapabilityMatch, RegistryError, RegistryResult, ToolRegistry};
pub use tool::{Tool, ToolArgs, ToolError, ToolResult};
