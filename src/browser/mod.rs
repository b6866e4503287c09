//! Browser automation for headless page rendering.
//!
//! Drives Chromium through a Playwright helper spawned as a `node -e` child
//! process. The helper performs the whole browser leg of a run: launch,
//! device emulation, navigation, in-page skeleton script execution, and a
//! single JSON result line on stdout.
//!
//! # Module Structure
//!
//! - [`session`] - one-shot render + script execution, headed session handle
//! - `playwright` - availability checks and helper error mapping
//! - `script` - embedded runner and skeleton builder JavaScript

mod playwright;
mod script;
mod session;

pub use session::{render_skeleton, HeadedSession, SkeletonCapture};
