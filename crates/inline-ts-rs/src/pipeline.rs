//! Pipeline instance: engine resolution and per-document transformation.

use crate::config::Config;
use inline_engine::{CompileFn, EngineError};
use inline_rewriter::{
    normalize_extension, rewrite_document, ImportPreserver, RewriteError, ScriptLocator,
};
use std::time::Instant;
use thiserror::Error;

/// Errors raised while constructing a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Engine resolution failed (unknown engine, bad options, missing
    /// toolchain).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The marker attribute produced an unusable pattern.
    #[error("invalid marker attribute: {0}")]
    InvalidMarker(#[from] regex::Error),
}

/// A configured pipeline with its engine resolved.
///
/// Created once at startup, used for many documents, discarded at the end
/// of the run. Holds the only cross-document state — the resolved compile
/// function — which is read-only, so documents may be transformed from
/// multiple threads at once.
pub struct Pipeline {
    locator: ScriptLocator,
    preserver: Option<ImportPreserver>,
    extensions: Vec<String>,
    js_script_attr: String,
    log_prefix: String,
    debug: bool,
    engine: String,
    compile: CompileFn,
}

impl Pipeline {
    /// Resolves the configured engine and builds the pipeline.
    ///
    /// This is the single suspension point of the whole system and must
    /// complete before any document is transformed. An unknown engine or a
    /// missing backend binary fails here — there is no fallback engine.
    pub async fn new(config: Config) -> Result<Self, PipelineError> {
        let compile = inline_engine::resolve(&config.engine, config.options.clone()).await?;
        let locator = ScriptLocator::new(&config.ts_script_attr)?;
        let preserver = config
            .keep_component_imports
            .then(|| ImportPreserver::new(&config.extensions));
        let extensions = config
            .extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        let log_prefix = if config.log_prefix.is_empty() {
            String::new()
        } else {
            format!(" {}", config.log_prefix)
        };

        Ok(Self {
            locator,
            preserver,
            extensions,
            js_script_attr: config.js_script_attr,
            log_prefix,
            debug: config.debug,
            engine: config.engine,
            compile,
        })
    }

    /// The engine identifier this pipeline resolved.
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Whether a file path's suffix is in the processing allowlist.
    pub fn wants(&self, file: &str) -> bool {
        let suffix = file.rsplit('.').next().unwrap_or(file);
        self.extensions.iter().any(|e| e == suffix)
    }

    /// Transforms one document.
    ///
    /// Returns the input unchanged when the file suffix is not allowlisted.
    /// Errors are contained here: a failing segment is reported to stderr
    /// and the original text comes back untouched — never a partial
    /// rewrite.
    pub fn transform(&self, source: &str, file: &str) -> String {
        if !self.wants(file) {
            return source.to_string();
        }

        let start = self.debug.then(Instant::now);

        match rewrite_document(
            source,
            &self.locator,
            self.preserver.as_ref(),
            &self.js_script_attr,
            &self.compile,
        ) {
            Ok(result) => {
                if let Some(start) = start {
                    eprintln!(
                        "✅{} Done: {} in {:.2} ms",
                        self.log_prefix,
                        file,
                        start.elapsed().as_secs_f64() * 1000.0
                    );
                }
                result
            }
            Err(RewriteError::Compile(e)) => {
                eprintln!("❌{} {}: {}", self.log_prefix, file, e);
                source.to_string()
            }
        }
    }
}
