//! Question-to-answer agent engine facade.
//!
//! Depend on this crate via `cargo add stepwise`. It bundles the engine
//! crates behind feature flags so downstream users can enable or disable
//! components as needed.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export the descriptor and capability primitives for convenience.
pub use step_primitives as primitives;

/// Tool trait, registry, and capability resolution (enabled by `tools`).
#[cfg(feature = "tools")]
pub use step_tools as tools;

/// Step-plan executor and plan runner (enabled by `engine`).
#[cfg(feature = "engine")]
pub use step_engine as engine;

/// Chat-model providers and LLM collaborators (enabled by `adapters`).
#[cfg(feature = "adapters")]
pub use step_adapters as adapters;

/// Ready-made stock, weather, and news tools (enabled by `toolkit`).
#[cfg(feature = "toolkit")]
pub use step_toolkit as toolkit;
