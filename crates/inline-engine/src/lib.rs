//! Interchangeable TypeScript transpilation engines.
//!
//! Four engines expose the same `text -> text` contract: the in-process `swc`
//! type stripper and subprocess adapters for `esbuild`, `bun` and `tsc`.
//! [`resolve`] turns an engine identifier plus an engine-specific options
//! payload into a [`CompileFn`] once per pipeline run; the returned function
//! is synchronous, carries no per-call state and may be shared across threads
//! for the lifetime of the pipeline.
//!
//! Engines differ in the whitespace and formatting of their output. That is
//! expected and never normalized here.

mod error;
mod process;
mod strip;

pub use error::EngineError;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// A resolved compile function: one segment of TypeScript in, JavaScript out.
pub type CompileFn = Box<dyn Fn(&str) -> Result<String, EngineError> + Send + Sync>;

/// Engine used when the caller does not pick one.
pub const DEFAULT_ENGINE: &str = "swc";

/// Options for the in-process swc type stripper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwcOptions {
    /// Parse the source as TSX instead of plain TypeScript.
    pub tsx: bool,
}

/// Options for the esbuild subprocess engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EsbuildOptions {
    /// Loader passed as `--loader=`.
    pub loader: String,
    /// Target passed as `--target=` when set.
    pub target: Option<String>,
    /// Extra arguments appended verbatim.
    pub extra_args: Vec<String>,
}

impl Default for EsbuildOptions {
    fn default() -> Self {
        Self {
            loader: "ts".to_string(),
            target: None,
            extra_args: Vec::new(),
        }
    }
}

/// Options for the bun subprocess engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BunOptions {
    /// Target passed as `--target=` when set.
    pub target: Option<String>,
    /// Extra arguments appended verbatim.
    pub extra_args: Vec<String>,
}

/// Options for the tsc subprocess engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TscOptions {
    /// `--target` value.
    pub target: String,
    /// `--module` value.
    pub module: String,
    /// Extra arguments appended verbatim.
    pub extra_args: Vec<String>,
}

impl Default for TscOptions {
    fn default() -> Self {
        Self {
            target: "esnext".to_string(),
            module: "esnext".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Resolves an engine identifier into a compile function.
///
/// Called once at pipeline start, before any document is processed. The
/// options payload is deserialized only by the matching engine; an
/// unrecognized identifier fails immediately instead of falling back to a
/// default engine. Subprocess engines are located on PATH and probed with
/// `--version` here so that a missing toolchain also fails at startup.
pub async fn resolve(engine: &str, options: Option<Value>) -> Result<CompileFn, EngineError> {
    match engine {
        "swc" => {
            let opts: SwcOptions = engine_options(options)?;
            Ok(Box::new(move |source| strip::strip_types(source, &opts)))
        }
        "esbuild" => {
            let opts: EsbuildOptions = engine_options(options)?;
            let path = process::find_tool("esbuild").await?;
            Ok(Box::new(move |source| {
                process::esbuild(&path, source, &opts)
            }))
        }
        "bun" => {
            let opts: BunOptions = engine_options(options)?;
            let path = process::find_tool("bun").await?;
            Ok(Box::new(move |source| process::bun(&path, source, &opts)))
        }
        "typescript" => {
            let opts: TscOptions = engine_options(options)?;
            let path = process::find_tool("tsc").await?;
            Ok(Box::new(move |source| process::tsc(&path, source, &opts)))
        }
        other => Err(EngineError::UnsupportedEngine(other.to_string())),
    }
}

fn engine_options<T: DeserializeOwned + Default>(options: Option<Value>) -> Result<T, EngineError> {
    match options {
        None => Ok(T::default()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
