//! Engine error types.

use thiserror::Error;

/// Errors raised by engine resolution and compilation.
///
/// `UnsupportedEngine`, `InvalidOptions` and `BinaryNotFound` surface at
/// resolution time and are fatal to pipeline startup. The remaining variants
/// are per-segment compile failures, contained at document granularity by the
/// caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown engine identifier.
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),

    /// Options payload did not match the selected engine's shape.
    #[error("invalid engine options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// External tool missing from PATH.
    #[error("{tool} binary not found on PATH")]
    BinaryNotFound { tool: &'static str },

    /// Failed to spawn an external tool.
    #[error("failed to spawn {tool}: {source}")]
    SpawnFailed {
        tool: &'static str,
        source: std::io::Error,
    },

    /// External tool exited with a failure.
    #[error("{tool} exited with code {code}: {stderr}")]
    ProcessFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    /// Source failed to parse as TypeScript.
    #[error("parse error: {0}")]
    Parse(String),

    /// Construct the in-process stripper cannot erase without code generation.
    #[error("unsupported syntax: {0}")]
    UnsupportedSyntax(String),

    /// Temp file or pipe I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
