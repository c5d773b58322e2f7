//! Core shared types for the stepwise agent engine.
//!
//! This crate carries the data shapes that describe a tool's callable
//! surface: parameter and operation specifications, the tool descriptor,
//! and the capability descriptors used for discovery and fallback
//! resolution. Everything here is pure data; behavior lives in the
//! `step-tools` and `step-engine` crates.

#![warn(missing_docs, clippy::pedantic)]

mod capability;
mod descriptor;
mod error;

/// Capability descriptors and supporting builders.
pub use capability::{Capability, CapabilityBuilder, CapabilitySummary};
/// Tool descriptor model: categories, type renderings, parameters, operations.
pub use descriptor::{
    OperationSpec, OperationSpecBuilder, ParameterSpec, ToolCategory, ToolDescriptor,
    ToolDescriptorBuilder, TypeSpec,
};
/// Error type and result alias shared across the engine crates.
pub use error::{Error, Result};
