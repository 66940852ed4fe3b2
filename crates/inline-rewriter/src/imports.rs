//! Component import preservation.
//!
//! A transpiler treats an import whose binding is never referenced as dead
//! code and may drop it, but imports of component files exist for their
//! side effect in the bundler's module graph. Before compilation every such
//! import gets a synthetic `void <binding>;` reference appended so the
//! backend sees the binding as used; after compilation each recorded
//! synthetic statement is removed again by exact literal match.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+([\w$]+)\s+from\s+["']([^"']+\.(\w+)(?:\?[^"']*)?)["'];?"#)
        .expect("import pattern is valid")
});

/// Normalizes a file extension to its word characters, so `.html` and
/// `html` compare equal.
pub fn normalize_extension(ext: &str) -> String {
    ext.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Injects and later strips synthetic references for component imports.
#[derive(Debug, Clone)]
pub struct ImportPreserver {
    extensions: Vec<String>,
}

impl ImportPreserver {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect();
        Self { extensions }
    }

    /// Rewrites a segment body, appending a synthetic reference after every
    /// default import of a component extension. Returns the rewritten body
    /// and the synthetic statements in injection order, one per import even
    /// when binding names repeat. Import statements are normalized to end in
    /// a terminator; paths with non-component extensions pass through.
    pub fn inject(&self, body: &str) -> (String, Vec<String>) {
        let mut synthetics = Vec::new();
        let rewritten = IMPORT_RE.replace_all(body, |caps: &Captures| {
            let binding = &caps[1];
            let ext = &caps[3];

            let mut stmt = caps[0].to_string();
            if !stmt.ends_with(';') {
                stmt.push(';');
            }

            if self.extensions.iter().any(|e| e == ext) {
                let synthetic = format!("void {binding};");
                stmt.push(' ');
                stmt.push_str(&synthetic);
                synthetics.push(synthetic);
            }

            stmt
        });
        (rewritten.into_owned(), synthetics)
    }
}

/// Removes each recorded synthetic statement from compiled output — first
/// literal occurrence only, one removal per injection.
///
/// Removal is deliberately not a re-parse: if the backend reformatted the
/// synthetic text (semicolon or whitespace drift), the statement survives as
/// a harmless no-op reference in the output.
pub fn strip_synthetics(compiled: &str, synthetics: &[String]) -> String {
    let mut out = compiled.to_string();
    for stmt in synthetics {
        out = out.replacen(stmt.as_str(), "", 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn preserver() -> ImportPreserver {
        ImportPreserver::new([".html"])
    }

    #[test]
    fn test_injects_reference_after_component_import() {
        let (body, synthetics) = preserver().inject("import card from './card.html';\n");
        assert_eq!(body, "import card from './card.html'; void card;\n");
        assert_eq!(synthetics, vec!["void card;".to_string()]);
    }

    #[test]
    fn test_appends_missing_terminator() {
        let (body, synthetics) = preserver().inject("import card from './card.html'\n");
        assert_eq!(body, "import card from './card.html'; void card;\n");
        assert_eq!(synthetics.len(), 1);
    }

    #[test]
    fn test_non_component_extension_untouched() {
        let src = "import helper from './helper.ts';\n";
        let (body, synthetics) = preserver().inject(src);
        assert_eq!(body, src);
        assert!(synthetics.is_empty());
    }

    #[test]
    fn test_query_suffix_is_accepted() {
        let (body, synthetics) = preserver().inject("import w from './w.html?raw';");
        assert_eq!(body, "import w from './w.html?raw'; void w;");
        assert_eq!(synthetics, vec!["void w;".to_string()]);
    }

    #[test]
    fn test_one_synthetic_per_import() {
        let src = "import a from './a.html';\nimport a from './again.html';\n";
        let (_, synthetics) = preserver().inject(src);
        assert_eq!(synthetics, vec!["void a;".to_string(), "void a;".to_string()]);
    }

    #[test]
    fn test_strip_removes_first_occurrence_per_synthetic() {
        let synthetics = vec!["void a;".to_string(), "void a;".to_string()];
        let compiled = "import a from './a.html'; void a;\nimport a from './again.html'; void a;\n";
        let out = strip_synthetics(compiled, &synthetics);
        assert!(!out.contains("void a;"));
        assert!(out.contains("import a from './a.html';"));
    }

    #[test]
    fn test_strip_tolerates_reformatted_output() {
        // Backend drifted the synthetic text; the marker stays behind.
        let synthetics = vec!["void a;".to_string()];
        let compiled = "void a\n";
        assert_eq!(strip_synthetics(compiled, &synthetics), "void a\n");
    }

    #[test]
    fn test_extension_normalization() {
        assert_eq!(normalize_extension(".html"), "html");
        assert_eq!(normalize_extension("html"), "html");
        let p = ImportPreserver::new(["html"]);
        let (_, synthetics) = p.inject("import c from './c.html';");
        assert_eq!(synthetics.len(), 1);
    }

    #[test]
    fn test_named_import_form_is_ignored() {
        // Only default-binding imports match the preservation pattern.
        let src = "import { part } from './part.html';\n";
        let (body, synthetics) = preserver().inject(src);
        assert_eq!(body, src);
        assert!(synthetics.is_empty());
    }
}
