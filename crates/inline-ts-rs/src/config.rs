//! Pipeline configuration.

use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value;
use std::fs;

/// Options controlling one pipeline run.
///
/// Field names mirror the JSON configuration file
/// (`inline-ts.config.json`); every field has a default so a partial file
/// is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// File suffixes eligible for processing.
    pub extensions: Vec<String>,

    /// Transpilation engine: `swc`, `esbuild`, `bun` or `typescript`.
    pub engine: String,

    /// Engine-specific options, passed through to the selected engine
    /// untouched and interpreted only by it.
    pub options: Option<Value>,

    /// Attribute identifying TypeScript script segments.
    pub ts_script_attr: String,

    /// Replacement for the marker attribute after transpilation.
    pub js_script_attr: String,

    /// Protect component imports from dead-code elimination.
    pub keep_component_imports: bool,

    /// Prefix for diagnostic messages.
    pub log_prefix: String,

    /// Per-file timing output.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec![".html".to_string()],
            engine: inline_engine::DEFAULT_ENGINE.to_string(),
            options: None,
            ts_script_attr: r#"lang="ts""#.to_string(),
            js_script_attr: String::new(),
            keep_component_imports: true,
            log_prefix: "[inline-ts-rs]".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file.
    pub fn load(path: &Utf8Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: failed to parse {}: {}", path, e);
                None
            }
        }
    }

    /// Finds and loads `inline-ts.config.json` from a project root.
    pub fn find(project_root: &Utf8Path) -> Option<Self> {
        let path = project_root.join("inline-ts.config.json");
        if path.exists() {
            Self::load(&path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.extensions, vec![".html".to_string()]);
        assert_eq!(config.engine, "swc");
        assert_eq!(config.ts_script_attr, r#"lang="ts""#);
        assert_eq!(config.js_script_attr, "");
        assert!(config.keep_component_imports);
        assert_eq!(config.log_prefix, "[inline-ts-rs]");
        assert!(!config.debug);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "engine": "esbuild", "jsScriptAttr": "type=\"module\"" }"#)
                .unwrap();
        assert_eq!(config.engine, "esbuild");
        assert_eq!(config.js_script_attr, "type=\"module\"");
        assert_eq!(config.extensions, vec![".html".to_string()]);
        assert!(config.keep_component_imports);
    }

    #[test]
    fn test_engine_options_pass_through() {
        let config: Config =
            serde_json::from_str(r#"{ "engine": "swc", "options": { "tsx": true } }"#).unwrap();
        assert_eq!(config.options, Some(serde_json::json!({ "tsx": true })));
    }
}
