//! inline-ts-rs: transpiles inline TypeScript inside markup documents.
//!
//! A [`Pipeline`] is created once per run — resolving the configured engine
//! is the only asynchronous step — and then transforms any number of
//! documents synchronously, in any order, including concurrently.
//!
//! # Example
//!
//! ```no_run
//! use inline_ts_rs::{Config, Pipeline};
//!
//! async fn demo() {
//!     let pipeline = Pipeline::new(Config::default()).await.unwrap();
//!     let html = "<script lang=\"ts\">const n: number = 1;</script>";
//!     let out = pipeline.transform(html, "index.html");
//!     assert!(out.contains("const n"));
//! }
//! ```

mod config;
mod pipeline;

pub use config::Config;
pub use pipeline::{Pipeline, PipelineError};
