//! Per-document rewrite pass.

use crate::imports::{strip_synthetics, ImportPreserver};
use crate::locator::ScriptLocator;
use inline_engine::{CompileFn, EngineError};
use thiserror::Error;

/// Errors surfaced while rewriting one document.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A segment failed to compile.
    #[error(transparent)]
    Compile(#[from] EngineError),
}

/// Rewrites every located segment of `document`.
///
/// For each segment: inject synthetic references (when a preserver is
/// given), compile the body, strip the synthetics, then emit the original
/// header with the marker attribute replaced by `replacement` (verbatim
/// first-occurrence text substitution), a newline, the compiled body, a
/// newline and the closing tag. Text outside segments is copied
/// byte-for-byte.
///
/// The first failing segment aborts the whole document; the caller falls
/// back to the original text, so a partially rewritten document is never
/// observable.
pub fn rewrite_document(
    document: &str,
    locator: &ScriptLocator,
    preserver: Option<&ImportPreserver>,
    replacement: &str,
    compile: &CompileFn,
) -> Result<String, RewriteError> {
    let segments = locator.segments(document);
    if segments.is_empty() {
        return Ok(document.to_string());
    }

    let mut out = String::with_capacity(document.len());
    let mut cursor = 0usize;

    for segment in segments {
        let (body, synthetics) = match preserver {
            Some(p) => p.inject(segment.body),
            None => (segment.body.to_string(), Vec::new()),
        };

        let compiled = compile(&body)?;
        let compiled = strip_synthetics(&compiled, &synthetics);

        out.push_str(&document[cursor..segment.start]);
        out.push_str(&segment.header.replacen(locator.marker(), replacement, 1));
        out.push('\n');
        out.push_str(&compiled);
        out.push_str("\n</script>");
        cursor = segment.end;
    }

    out.push_str(&document[cursor..]);
    Ok(out)
}
