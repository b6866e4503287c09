//! Browser session driving one render + in-page script execution.
//!
//! One helper child process per run: it launches Chromium, navigates, runs
//! the skeleton builder, and reports a single JSON line on stdout. Headless
//! runs close the browser and exit; headed runs keep the browser (and the
//! child) alive after reporting so the page stays inspectable.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;

use crate::config::ResolvedConfig;
use crate::progress::ProgressCallback;
use crate::{Result, SkelError};

use super::playwright::{
    ensure_node_available, ensure_playwright_available, is_mock_rendering_enabled,
    map_helper_error, map_spawn_error, HelperResult,
};
use super::script::RUNNER_SCRIPT;

/// Outcome of one page render + script execution.
pub struct SkeletonCapture {
    /// The generated fragment; empty when the in-page script failed.
    pub html: String,
    /// Message from a recovered in-page script failure.
    pub script_error: Option<String>,
    /// Wall time from spawn to result line.
    pub elapsed: Duration,
    /// Live helper process for headed runs; `None` when headless.
    pub session: Option<HeadedSession>,
}

/// Handle to a headed helper child whose browser is still open.
pub struct HeadedSession {
    child: Child,
}

impl HeadedSession {
    /// Block until the user closes the browser.
    pub async fn wait(mut self) -> Result<()> {
        self.child.wait().await?;
        Ok(())
    }

    /// Tear the browser down without waiting.
    pub async fn close(mut self) -> Result<()> {
        self.child.kill().await?;
        self.child.wait().await?;
        Ok(())
    }
}

fn log_progress(progress: &Option<ProgressCallback>, message: &str) {
    if let Some(cb) = progress {
        cb(message);
    }
}

/// Render the configured URL and execute the skeleton builder in-page.
///
/// Navigation and launch failures are fatal; an in-page script failure is
/// reported through [`SkeletonCapture::script_error`] with an empty fragment
/// so the caller can still produce an output file.
pub async fn render_skeleton(
    config: &ResolvedConfig,
    progress: Option<ProgressCallback>,
) -> Result<SkeletonCapture> {
    if is_mock_rendering_enabled() {
        return Ok(mock_capture());
    }

    // Fail fast before spawning a browser for nothing.
    ensure_node_available(&config.node_command).await?;
    ensure_playwright_available(&config.node_command).await?;

    let headers_json = match &config.extra_http_headers {
        Some(headers) => serde_json::to_string(headers)?,
        None => String::new(),
    };

    let mut cmd = Command::new(&config.node_command);
    cmd.arg("-e")
        .arg(RUNNER_SCRIPT)
        .arg(&config.url)
        .arg(if config.headless { "1" } else { "0" })
        .arg(config.device.as_deref().unwrap_or_default())
        .arg(&headers_json)
        .arg(config.navigation_timeout.as_millis().to_string())
        .arg(config.init.to_source())
        .arg(config.include_element.to_source())
        .arg(&config.background)
        .arg(&config.animation)
        .arg(&config.root_node)
        .arg(config.header_json()?)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    log_progress(
        &progress,
        &format!("Opening page {} (headless: {})…", config.url, config.headless),
    );

    let start = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|err| map_spawn_error(err, &config.node_command))?;

    let stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| SkelError::browser("Helper stdout was not captured"))?;
    let stderr_pipe = child.stderr.take();

    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_pipe {
            let _ = err.read_to_end(&mut buf).await;
        }
        buf
    });

    // The helper emits exactly one result line; in headed mode the process
    // stays alive afterwards, so read line-wise instead of waiting for exit.
    let mut lines = BufReader::new(stdout_pipe).lines();
    let first_line = match timeout(config.process_timeout, lines.next_line()).await {
        Ok(Ok(line)) => line,
        Ok(Err(err)) => {
            let _ = child.kill().await;
            let _ = child.wait().await;
            return Err(SkelError::Io(err));
        }
        Err(_) => {
            let _ = child.kill().await;
            let _ = child.wait().await;
            return Err(SkelError::browser(format!(
                "Playwright helper timed out after {:?}",
                config.process_timeout
            )));
        }
    };

    let Some(line) = first_line else {
        // Stdout closed without a result: the helper died, stderr says why.
        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_else(|_| Vec::new());
        return Err(map_helper_error(
            status.to_string(),
            &String::from_utf8_lossy(&stderr),
        ));
    };

    let result: HelperResult = serde_json::from_str(&line).map_err(|e| {
        SkelError::browser(format!(
            "Failed to parse helper output: {} - raw: {}",
            e,
            line.trim()
        ))
    })?;

    if result.status != "ok" {
        let _ = child.kill().await;
        let _ = child.wait().await;
        let detail = result.message.as_deref().unwrap_or("no additional details");
        return Err(SkelError::browser(format!(
            "Playwright helper returned non-ok status {}: {}",
            result.status, detail
        )));
    }

    let elapsed = start.elapsed();
    log_progress(
        &progress,
        &format!("Skeleton captured in {:.1}s", elapsed.as_secs_f32()),
    );

    let session = if config.headless {
        // Headless helpers close the browser and exit on their own.
        let _ = timeout(config.process_timeout, child.wait()).await;
        None
    } else {
        Some(HeadedSession { child })
    };

    Ok(SkeletonCapture {
        html: result.html.unwrap_or_default(),
        script_error: result.script_error,
        elapsed,
        session,
    })
}

fn mock_capture() -> SkeletonCapture {
    let script_error = std::env::var("SKELGEN_MOCK_SCRIPT_ERROR").ok();
    let html = if script_error.is_some() {
        String::new()
    } else {
        std::env::var("SKELGEN_MOCK_HTML").unwrap_or_default()
    };
    SkeletonCapture {
        html,
        script_error,
        elapsed: Duration::ZERO,
        session: None,
    }
}
