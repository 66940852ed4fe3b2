//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;
use inline_ts_rs::Config;

/// Inline TypeScript transpilation for markup documents.
#[derive(Debug, Parser)]
#[command(name = "inline-ts-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Working directory to scan
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Output directory for rewritten documents
    #[arg(long = "out-dir", default_value = "dist")]
    pub out_dir: Utf8PathBuf,

    /// Transpilation engine (swc, esbuild, bun, typescript)
    #[arg(long)]
    pub engine: Option<String>,

    /// Engine-specific options (JSON)
    #[arg(long = "engine-options")]
    pub engine_options: Option<String>,

    /// File extensions to process (comma-separated)
    #[arg(long)]
    pub extensions: Option<String>,

    /// Attribute marking TypeScript script segments
    #[arg(long = "ts-script-attr")]
    pub ts_script_attr: Option<String>,

    /// Attribute replacing the marker after transpilation
    #[arg(long = "js-script-attr")]
    pub js_script_attr: Option<String>,

    /// Do not protect component imports from dead-code elimination
    #[arg(long = "no-keep-component-imports")]
    pub no_keep_component_imports: bool,

    /// Prefix for diagnostic messages
    #[arg(long = "log-prefix")]
    pub log_prefix: Option<String>,

    /// Print per-file timings
    #[arg(long)]
    pub debug: bool,

    /// Report which files would change without writing anything
    #[arg(long)]
    pub check: bool,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,
}

impl Args {
    /// Overlays command-line flags onto a base configuration.
    pub fn apply(&self, mut config: Config) -> Result<Config, serde_json::Error> {
        if let Some(engine) = &self.engine {
            config.engine = engine.clone();
        }
        if let Some(raw) = &self.engine_options {
            config.options = Some(serde_json::from_str(raw)?);
        }
        if let Some(extensions) = &self.extensions {
            config.extensions = extensions
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(attr) = &self.ts_script_attr {
            config.ts_script_attr = attr.clone();
        }
        if let Some(attr) = &self.js_script_attr {
            config.js_script_attr = attr.clone();
        }
        if self.no_keep_component_imports {
            config.keep_component_imports = false;
        }
        if let Some(prefix) = &self.log_prefix {
            config.log_prefix = prefix.clone();
        }
        if self.debug {
            config.debug = true;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["inline-ts-rs"]);
        assert_eq!(args.workspace.as_str(), ".");
        assert_eq!(args.out_dir.as_str(), "dist");
        assert!(args.engine.is_none());
        assert!(!args.check);
    }

    #[test]
    fn test_engine_flag_overrides_config() {
        let args = Args::parse_from(["inline-ts-rs", "--engine", "esbuild"]);
        let config = args.apply(Config::default()).unwrap();
        assert_eq!(config.engine, "esbuild");
    }

    #[test]
    fn test_extensions_flag_is_comma_separated() {
        let args = Args::parse_from(["inline-ts-rs", "--extensions", ".html, .vue"]);
        let config = args.apply(Config::default()).unwrap();
        assert_eq!(config.extensions, vec![".html".to_string(), ".vue".to_string()]);
    }

    #[test]
    fn test_engine_options_must_be_json() {
        let args = Args::parse_from(["inline-ts-rs", "--engine-options", "{ tsx: true }"]);
        assert!(args.apply(Config::default()).is_err());

        let args = Args::parse_from(["inline-ts-rs", "--engine-options", r#"{ "tsx": true }"#]);
        let config = args.apply(Config::default()).unwrap();
        assert_eq!(config.options, Some(serde_json::json!({ "tsx": true })));
    }

    #[test]
    fn test_no_keep_component_imports() {
        let args = Args::parse_from(["inline-ts-rs", "--no-keep-component-imports"]);
        let config = args.apply(Config::default()).unwrap();
        assert!(!config.keep_component_imports);
    }

    #[test]
    fn test_flags_left_unset_keep_config_values() {
        let args = Args::parse_from(["inline-ts-rs"]);
        let mut base = Config::default();
        base.engine = "bun".to_string();
        base.debug = true;
        let config = args.apply(base).unwrap();
        assert_eq!(config.engine, "bun");
        assert!(config.debug);
    }
}
