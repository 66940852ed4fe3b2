//! inline-ts-rs: transpiles inline TypeScript inside markup documents.

mod cli;
mod runner;

use clap::Parser;
use cli::Args;
use inline_ts_rs::{Config, Pipeline};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let base = Config::find(&args.workspace).unwrap_or_default();
    let config = match args.apply(base) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid --engine-options: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = match Pipeline::new(config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match runner::run(&args, &pipeline) {
        Ok(summary) => {
            println!(
                "{} file(s) scanned, {} rewritten ({})",
                summary.scanned,
                summary.rewritten,
                pipeline.engine()
            );
            if args.check && summary.rewritten > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
