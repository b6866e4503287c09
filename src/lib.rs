//! skelgen library
//!
//! Renders a web page in a headless browser, executes an in-page script that
//! walks the live DOM and builds a skeleton-screen placeholder fragment, and
//! injects the fragment into an HTML document on disk.
//!
//! # Module Overview
//!
//! - [`config`] - configuration resolution and validation
//! - [`hooks`] - named in-page hook kinds and their JS serialization
//! - [`browser`] - Playwright helper process driving Chromium
//! - [`pipeline`] - the render → evaluate → persist pipeline
//! - [`output`] - selector-based injection into the target document
//! - [`template`] - bundled default HTML page
//!
//! # Example
//!
//! ```no_run
//! use skelgen_lib::{SkeletonConfig, SkeletonPipeline};
//! use std::path::Path;
//!
//! # async fn example() -> skelgen_lib::Result<()> {
//! let mut config = SkeletonConfig::new("https://example.com");
//! config.output_path = Some("dist/index.html".into());
//!
//! let summary = SkeletonPipeline::new(config, Path::new("."))?.start().await?;
//! println!("skeleton written to {:?}", summary.destination.path());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod hooks;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod template;

pub use browser::{HeadedSession, SkeletonCapture};
pub use config::{
    HeaderConfig, OutputTarget, ResolvedConfig, SkeletonConfig, WriteHandler,
    DEFAULT_BACKGROUND, DEFAULT_INJECT_SELECTOR,
};
pub use error::{ErrorCategory, ErrorPayload, Result, SkelError};
pub use hooks::{IncludeHook, InitHook};
pub use output::{inject_fragment, parse_selector, write_to_filepath};
pub use pipeline::{OutputDestination, RunSummary, SkeletonPipeline};
pub use progress::ProgressCallback;
pub use template::DEFAULT_TEMPLATE;
