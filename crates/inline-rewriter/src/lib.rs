//! Inline script rewriting.
//!
//! This crate owns the purely textual half of the pipeline: locating
//! `<script>` segments by marker attribute, keeping component imports alive
//! across a transpiler's dead-code elimination, and splicing compiled bodies
//! back into the document.
//!
//! Location is pattern-based on purpose. There is no markup parser here, no
//! well-formedness checking, and no support for nested script regions;
//! malformed documents degrade to whatever spans the pattern finds.

mod imports;
mod locator;
mod rewrite;

pub use imports::{normalize_extension, strip_synthetics, ImportPreserver};
pub use locator::{ScriptBlock, ScriptLocator};
pub use rewrite::{rewrite_document, RewriteError};
