//! Named hook kinds serialized into the page context.
//!
//! The skeleton script runs inside the browser page, which cannot share
//! closures with the host process, so hooks cross that boundary as function
//! source text. Rather than accepting arbitrary source from the caller, the
//! supported behaviors form a closed set of variants that render themselves
//! to JavaScript on demand.

use serde::{Deserialize, Serialize};

/// Setup hook executed once before the DOM walk starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum InitHook {
    /// Do nothing.
    #[default]
    NoOp,
    /// Remove every element matching one of the selectors before the walk,
    /// so transient UI (toasts, cookie banners) never becomes a placeholder.
    HideSelectors { selectors: Vec<String> },
    /// Scroll the page to the top so bounding boxes are viewport-relative.
    ScrollToTop,
}

impl InitHook {
    /// Render the hook as JavaScript function source.
    pub fn to_source(&self) -> String {
        match self {
            InitHook::NoOp => "function() {}".to_string(),
            InitHook::HideSelectors { selectors } => {
                let json = serde_json::to_string(selectors).unwrap_or_else(|_| "[]".to_string());
                format!(
                    "function() {{ for (const sel of {json}) {{ \
                     document.querySelectorAll(sel).forEach(el => el.remove()); }} }}"
                )
            }
            InitHook::ScrollToTop => "function() { window.scrollTo(0, 0); }".to_string(),
        }
    }
}

/// Predicate deciding whether an element becomes a placeholder block.
///
/// The page script calls this with each candidate element; a falsy return
/// leaves the decision to the built-in heuristics, `false`-by-exclusion
/// variants skip the element entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum IncludeHook {
    /// Defer to the built-in heuristics for every element.
    #[default]
    All,
    /// Skip elements matching any of the selectors (and their subtrees).
    ExcludeSelectors { selectors: Vec<String> },
    /// Skip elements smaller than the given size in CSS pixels.
    MinSize { width: f64, height: f64 },
}

impl IncludeHook {
    /// Render the predicate as JavaScript function source. The function
    /// receives the element and returns `false` to exclude it; any other
    /// return defers to the built-in heuristics.
    pub fn to_source(&self) -> String {
        match self {
            IncludeHook::All => "function(el) {}".to_string(),
            IncludeHook::ExcludeSelectors { selectors } => {
                let json = serde_json::to_string(selectors).unwrap_or_else(|_| "[]".to_string());
                format!(
                    "function(el) {{ for (const sel of {json}) {{ \
                     if (el.matches(sel)) return false; }} }}"
                )
            }
            IncludeHook::MinSize { width, height } => format!(
                "function(el) {{ const r = el.getBoundingClientRect(); \
                 if (r.width < {width} || r.height < {height}) return false; }}"
            ),
        }
    }
}
