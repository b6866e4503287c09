//! The page-to-skeleton generation pipeline.
//!
//! One linear async run: render the page and execute the in-page skeleton
//! builder, then persist the generated fragment by a mutually exclusive
//! priority order decided once at configuration time — caller write handler,
//! resolved output file, or a fallback default page in the base directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::browser::{render_skeleton, HeadedSession};
use crate::config::{OutputTarget, ResolvedConfig, SkeletonConfig};
use crate::output::{parse_selector, write_to_filepath};
use crate::progress::ProgressCallback;
use crate::template::DEFAULT_TEMPLATE;
use crate::Result;

/// Where the generated fragment ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    /// The caller's write handler consumed the fragment; the pipeline did
    /// not touch the filesystem.
    Handler,
    /// Injected into the resolved output file.
    File(PathBuf),
    /// No handler and no output path: injected into a freshly created
    /// default page in the base directory.
    FallbackFile(PathBuf),
}

impl OutputDestination {
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputDestination::Handler => None,
            OutputDestination::File(path) | OutputDestination::FallbackFile(path) => Some(path),
        }
    }
}

/// Result of a completed run.
pub struct RunSummary {
    pub destination: OutputDestination,
    /// Message from a recovered in-page script failure, if any.
    pub script_error: Option<String>,
    /// Live browser session for headed runs; wait on it to keep the page
    /// open, drop or close it to end the run.
    pub session: Option<HeadedSession>,
}

/// Orchestrates one skeleton generation run.
pub struct SkeletonPipeline {
    config: ResolvedConfig,
    progress: Option<ProgressCallback>,
}

impl SkeletonPipeline {
    /// Validate the configuration against `base_dir` and build the pipeline.
    /// All validation errors surface here, before any browser work.
    pub fn new(config: SkeletonConfig, base_dir: &Path) -> Result<Self> {
        Ok(Self {
            config: config.resolve(base_dir)?,
            progress: None,
        })
    }

    /// Attach a status callback invoked with human-readable progress lines.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The resolved output target, mostly useful for callers that want to
    /// know where output will land before starting.
    pub fn target(&self) -> &OutputTarget {
        &self.config.target
    }

    /// Run the pipeline: render, execute the in-page script, persist.
    pub async fn start(self) -> Result<RunSummary> {
        let capture = render_skeleton(&self.config, self.progress.clone()).await?;

        if let Some(message) = &capture.script_error {
            self.report(&format!(
                "warning: in-page script failed ({message}); continuing with an empty skeleton"
            ));
        }

        let destination = self.persist(&capture.html)?;

        match &destination {
            OutputDestination::Handler => {
                self.report("skeleton handed to the configured write handler");
            }
            OutputDestination::File(path) => {
                self.report(&format!(
                    "skeleton screen created and output to {}",
                    path.display()
                ));
            }
            OutputDestination::FallbackFile(path) => {
                self.report(&format!(
                    "skeleton screen created and output to {}",
                    path.display()
                ));
            }
        }

        Ok(RunSummary {
            destination,
            script_error: capture.script_error,
            session: capture.session,
        })
    }

    /// Persistence decision, in priority order: write handler, resolved
    /// output file, fallback default page.
    fn persist(&self, fragment: &str) -> Result<OutputDestination> {
        if let Some(handler) = &self.config.write_handler {
            handler(fragment, self.config.target.as_path());
            return Ok(OutputDestination::Handler);
        }

        // The selector was validated during resolution.
        let selector = parse_selector(&self.config.inject_selector)?;

        if let Some(path) = self.config.target.as_path() {
            write_to_filepath(path, &selector, fragment)?;
            return Ok(OutputDestination::File(path.to_path_buf()));
        }

        let fallback = self.config.base_dir.join("index.html");
        fs::write(&fallback, DEFAULT_TEMPLATE)?;
        write_to_filepath(&fallback, &selector, fragment)?;
        self.report(&format!(
            "warning: no output configured, skeleton written to a default page: {}",
            fallback.display()
        ));
        Ok(OutputDestination::FallbackFile(fallback))
    }

    fn report(&self, message: &str) {
        if let Some(cb) = &self.progress {
            cb(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkeletonConfig;
    use scraper::{Html, Selector};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn body_inner(document: &str) -> String {
        let doc = Html::parse_document(document);
        let sel = Selector::parse("body").expect("selector");
        doc.select(&sel)
            .next()
            .map(|el| el.inner_html())
            .unwrap_or_default()
    }

    #[test]
    fn write_handler_takes_priority_and_filesystem_is_untouched() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("out.html");
        fs::write(&out, "<html><body><p>old</p></body></html>").expect("write");

        let calls: Arc<Mutex<Vec<(String, Option<PathBuf>)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();

        let mut cfg = SkeletonConfig::new("https://example.com");
        cfg.output_path = Some(out.clone());
        cfg.write_handler = Some(Arc::new(move |html, path| {
            seen.lock()
                .unwrap()
                .push((html.to_string(), path.map(Path::to_path_buf)));
        }));

        let pipeline = SkeletonPipeline::new(cfg, dir.path()).expect("pipeline");
        let destination = pipeline.persist("<div>frag</div>").expect("persist");

        assert_eq!(destination, OutputDestination::Handler);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "handler must be called exactly once");
        assert_eq!(calls[0].0, "<div>frag</div>");
        assert_eq!(calls[0].1.as_deref(), Some(out.as_path()));

        // The writer must not have run.
        let on_disk = fs::read_to_string(&out).expect("read");
        assert_eq!(on_disk, "<html><body><p>old</p></body></html>");
    }

    #[test]
    fn resolved_path_receives_injected_fragment() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("out.html");
        fs::write(&out, "<html><body></body></html>").expect("write");

        let mut cfg = SkeletonConfig::new("https://example.com");
        cfg.output_path = Some(out.clone());

        let pipeline = SkeletonPipeline::new(cfg, dir.path()).expect("pipeline");
        let destination = pipeline.persist("<div id=\"skeleton\"></div>").expect("persist");

        assert_eq!(destination, OutputDestination::File(out.clone()));
        let written = fs::read_to_string(&out).expect("read");
        assert_eq!(body_inner(&written), "<div id=\"skeleton\"></div>");
    }

    #[test]
    fn no_handler_and_no_path_falls_back_to_default_page() {
        let dir = TempDir::new().expect("tempdir");

        let cfg = SkeletonConfig::new("https://example.com");
        let pipeline = SkeletonPipeline::new(cfg, dir.path()).expect("pipeline");
        let destination = pipeline.persist("<div>frag</div>").expect("persist");

        let expected = dir.path().join("index.html");
        assert_eq!(destination, OutputDestination::FallbackFile(expected.clone()));
        let written = fs::read_to_string(&expected).expect("read");
        assert_eq!(body_inner(&written), "<div>frag</div>");
    }

    #[test]
    fn empty_fragment_leaves_target_content_alone() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("out.html");
        fs::write(&out, "<html><body><p>keep</p></body></html>").expect("write");

        let mut cfg = SkeletonConfig::new("https://example.com");
        cfg.output_path = Some(out.clone());

        let pipeline = SkeletonPipeline::new(cfg, dir.path()).expect("pipeline");
        pipeline.persist("").expect("persist");

        let written = fs::read_to_string(&out).expect("read");
        assert_eq!(body_inner(&written), "<p>keep</p>");
    }

    #[test]
    fn custom_inject_selector_is_honored() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("out.html");
        fs::write(
            &out,
            "<html><body><div id=\"mount\"><p>old</p></div><div>other</div></body></html>",
        )
        .expect("write");

        let mut cfg = SkeletonConfig::new("https://example.com");
        cfg.output_path = Some(out.clone());
        cfg.inject_selector = "#mount".to_string();

        let pipeline = SkeletonPipeline::new(cfg, dir.path()).expect("pipeline");
        pipeline.persist("<span>sk</span>").expect("persist");

        let written = fs::read_to_string(&out).expect("read");
        let doc = Html::parse_document(&written);
        let mount = Selector::parse("#mount").expect("selector");
        assert_eq!(
            doc.select(&mount).next().map(|el| el.inner_html()),
            Some("<span>sk</span>".to_string())
        );
        assert!(written.contains("<div>other</div>"));
    }

    #[test]
    fn validation_happens_before_any_browser_work() {
        // Constructing the pipeline with a bad config must fail immediately;
        // no async browser call is reachable first.
        let err = SkeletonPipeline::new(SkeletonConfig::new(""), Path::new("."))
            .err()
            .expect("missing url must fail in new()");
        assert!(err.is_validation(), "got: {err:?}");
    }
}
