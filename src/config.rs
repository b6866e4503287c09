//! Configuration resolution for a skeleton generation run.
//!
//! A [`SkeletonConfig`] is built once per invocation, validated and
//! normalized into a [`ResolvedConfig`] before any browser work begins, and
//! never reconsidered mid-run.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::hooks::{IncludeHook, InitHook};
use crate::template::DEFAULT_TEMPLATE;
use crate::{Result, SkelError};

/// Default placeholder color, matching the grey most skeleton screens use.
pub const DEFAULT_BACKGROUND: &str = "#ecf0f2";

/// Default mount point for the generated fragment inside the target document.
pub const DEFAULT_INJECT_SELECTOR: &str = "body";

const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(60);

/// Caller-supplied persistence override. Receives the generated fragment and
/// the resolved output path (if one was configured); when set, the pipeline
/// never touches the filesystem itself.
pub type WriteHandler = Arc<dyn Fn(&str, Option<&Path>) + Send + Sync>;

/// Optional header bar drawn at the top of the skeleton.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeaderConfig {
    /// Height in CSS pixels.
    pub height: f64,
    /// Fill color; falls back to the skeleton background when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// User-facing settings for one skeleton generation run.
#[derive(Clone)]
pub struct SkeletonConfig {
    /// Page to render. Required, must parse as an absolute URL.
    pub url: String,
    /// Output file or directory; relative paths resolve against the base
    /// directory passed to [`SkeletonConfig::resolve`].
    pub output_path: Option<PathBuf>,
    /// CSS selector for the injection mount point.
    pub inject_selector: String,
    /// Placeholder block color.
    pub background: String,
    /// CSS `animation` value applied to the skeleton container.
    pub animation: String,
    /// Selector for the DOM walk root; empty means `document.body`.
    pub root_node: String,
    /// Optional header bar.
    pub header: Option<HeaderConfig>,
    /// Playwright device-registry name for emulation (e.g. "iPhone 13").
    pub device: Option<String>,
    /// Run the browser headless. Headed runs keep the browser open after the
    /// skeleton is written.
    pub headless: bool,
    /// Extra HTTP headers applied to the page's requests.
    pub extra_http_headers: Option<HashMap<String, String>>,
    /// Persistence override; see [`WriteHandler`].
    pub write_handler: Option<WriteHandler>,
    /// In-page setup hook.
    pub init: InitHook,
    /// In-page element predicate.
    pub include_element: IncludeHook,
    /// Node.js command used to spawn the Playwright helper.
    pub node_command: String,
    /// Timeout for page navigation.
    pub navigation_timeout: Duration,
    /// Timeout for the whole helper process (headless runs only).
    pub process_timeout: Duration,
}

impl SkeletonConfig {
    /// Create a configuration with documented defaults for everything but
    /// the entry URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_path: None,
            inject_selector: DEFAULT_INJECT_SELECTOR.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            animation: String::new(),
            root_node: String::new(),
            header: None,
            device: None,
            headless: true,
            extra_http_headers: None,
            write_handler: None,
            init: InitHook::default(),
            include_element: IncludeHook::default(),
            node_command: "node".to_string(),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
        }
    }

    /// Validate and normalize into a [`ResolvedConfig`].
    ///
    /// `base_dir` anchors relative output paths and the no-path fallback
    /// page; it is passed explicitly rather than read from the process-wide
    /// working directory.
    ///
    /// Side effect: when the output path names an existing directory, a new
    /// `index.html` seeded from the bundled template is created inside it
    /// and becomes the effective target.
    pub fn resolve(self, base_dir: &Path) -> Result<ResolvedConfig> {
        if self.url.trim().is_empty() {
            return Err(SkelError::validation("please provide an entry url"));
        }
        Url::parse(&self.url)
            .map_err(|e| SkelError::validation(format!("invalid url {:?}: {e}", self.url)))?;
        crate::output::parse_selector(&self.inject_selector)?;

        let target = match self.output_path {
            None => OutputTarget::Unset,
            Some(path) => {
                let path = if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                };
                if !path.exists() {
                    return Err(SkelError::validation(format!(
                        "output path does not exist: {}",
                        path.display()
                    )));
                }
                if path.is_dir() {
                    let file = path.join("index.html");
                    fs::write(&file, DEFAULT_TEMPLATE)?;
                    OutputTarget::File(file)
                } else {
                    OutputTarget::File(path)
                }
            }
        };

        Ok(ResolvedConfig {
            base_dir: base_dir.to_path_buf(),
            url: self.url,
            target,
            inject_selector: self.inject_selector,
            background: self.background,
            animation: self.animation,
            root_node: self.root_node,
            header: self.header,
            device: self.device,
            headless: self.headless,
            extra_http_headers: self.extra_http_headers,
            write_handler: self.write_handler,
            init: self.init,
            include_element: self.include_element,
            node_command: self.node_command,
            navigation_timeout: self.navigation_timeout,
            process_timeout: self.process_timeout,
        })
    }
}

/// Where the generated document lands. The directory case from the user's
/// configuration is collapsed to `File` during resolution, so the pipeline
/// only ever sees a concrete file or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Unset,
}

impl OutputTarget {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            OutputTarget::File(path) => Some(path),
            OutputTarget::Unset => None,
        }
    }
}

/// Fully validated settings consumed by the pipeline. Immutable for the rest
/// of the run.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub base_dir: PathBuf,
    pub url: String,
    pub target: OutputTarget,
    pub inject_selector: String,
    pub background: String,
    pub animation: String,
    pub root_node: String,
    pub header: Option<HeaderConfig>,
    pub device: Option<String>,
    pub headless: bool,
    pub extra_http_headers: Option<HashMap<String, String>>,
    pub write_handler: Option<WriteHandler>,
    pub init: InitHook,
    pub include_element: IncludeHook,
    pub node_command: String,
    pub navigation_timeout: Duration,
    pub process_timeout: Duration,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("base_dir", &self.base_dir)
            .field("url", &self.url)
            .field("target", &self.target)
            .field("inject_selector", &self.inject_selector)
            .field("background", &self.background)
            .field("animation", &self.animation)
            .field("root_node", &self.root_node)
            .field("header", &self.header)
            .field("device", &self.device)
            .field("headless", &self.headless)
            .field("extra_http_headers", &self.extra_http_headers)
            .field(
                "write_handler",
                &self.write_handler.as_ref().map(|_| "Fn(..)"),
            )
            .field("init", &self.init)
            .field("include_element", &self.include_element)
            .field("node_command", &self.node_command)
            .field("navigation_timeout", &self.navigation_timeout)
            .field("process_timeout", &self.process_timeout)
            .finish()
    }
}

impl ResolvedConfig {
    /// Header serialized for the page script; empty string when unset, so
    /// the script can distinguish "no header" without JSON null handling.
    pub fn header_json(&self) -> Result<String> {
        match &self.header {
            None => Ok(String::new()),
            Some(header) => Ok(serde_json::to_string(header)?),
        }
    }
}
