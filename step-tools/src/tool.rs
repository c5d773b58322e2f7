//! The fixed surface every concrete data-source tool implements.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use step_primitives::ToolDescriptor;

/// Named arguments delivered to a tool operation.
pub type ToolArgs = serde_json::Map<String, Value>;

/// Result alias for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Trait implemented by every tool the registry can own.
///
/// Nothing more is assumed of a tool by the engine: it describes itself
/// once, and it answers invocations of its named operations. Transport
/// details (HTTP clients, API keys) stay inside the implementation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the descriptor built alongside this tool at definition time.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Invokes the named operation with the supplied arguments.
    ///
    /// The call may suspend on I/O; the executor awaits completion.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the operation is unknown to the
    /// implementation, the arguments are unusable, or execution fails.
    async fn invoke(&self, operation: &str, args: ToolArgs) -> ToolResult<Value>;
}

/// Errors surfaced by tool implementations during invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The implementation does not expose the requested operation.
    #[error("operation `{operation}` is not implemented by `{tool}`")]
    UnknownOperation {
        /// Tool name.
        tool: String,
        /// Requested operation name.
        operation: String,
    },

    /// The supplied arguments were missing or of the wrong shape.
    #[error("invalid arguments: {reason}")]
    InvalidArguments {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The operation itself failed.
    #[error("tool execution failed: {reason}")]
    Execution {
        /// Human-readable error returned by the implementation.
        reason: String,
    },
}

impl ToolError {
    /// Creates an unknown-operation error.
    #[must_use]
    pub fn unknown_operation(tool: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            tool: tool.into(),
            operation: operation.into(),
        }
    }

    /// Creates an invalid-arguments error.
    #[must_use]
    pub fn invalid_arguments(reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            reason: reason.into(),
        }
    }

    /// Creates an execution error.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}
