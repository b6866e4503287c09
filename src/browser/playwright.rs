//! Availability checks and error mapping for the Playwright helper.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::{Result, SkelError};

use super::script::PLAYWRIGHT_CHECK_SCRIPT;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Result line emitted by the helper on stdout.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HelperResult {
    pub status: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub script_error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error line emitted by the helper on stderr.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct HelperError {
    pub status: String,
    pub message: String,
}

/// Maps a spawn error to an appropriate SkelError.
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> SkelError {
    if err.kind() == io::ErrorKind::NotFound {
        SkelError::browser(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        SkelError::Io(err)
    }
}

/// Maps helper stderr output to an appropriate SkelError.
pub(crate) fn map_helper_error(status_text: impl Into<String>, stderr: &str) -> SkelError {
    if let Ok(error) = serde_json::from_str::<HelperError>(stderr) {
        return map_helper_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return SkelError::browser(
            "Playwright npm package is missing; install with `npm install playwright`.",
        );
    }

    if lower.contains("timeout") {
        return SkelError::browser(
            "Playwright helper timed out; try increasing --nav-timeout/--process-timeout, and ensure the page finishes loading.",
        );
    }

    SkelError::browser(format!(
        "Playwright helper exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

/// Maps a helper status error to an appropriate SkelError.
pub(crate) fn map_helper_status_error(status: &str, message: String) -> SkelError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        SkelError::browser(
            "Playwright npm package is missing; install with `npm install playwright`.",
        )
    } else if lower.contains("timeout") {
        SkelError::browser(format!(
            "Playwright error (status {}): {}. Hint: increase --nav-timeout, and ensure the page finishes loading.",
            status, message
        ))
    } else {
        SkelError::browser(format!("Playwright error (status {}): {}", status, message))
    }
}

/// Checks if browser mocking is enabled via environment variables.
pub(crate) fn is_mock_rendering_enabled() -> bool {
    std::env::var("SKELGEN_MOCK_HTML").is_ok()
        || std::env::var("SKELGEN_MOCK_SCRIPT_ERROR").is_ok()
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            SkelError::browser(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(SkelError::browser(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package is installed.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    if is_mock_rendering_enabled() {
        return Ok(());
    }

    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            SkelError::browser(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_helper_error(format!("{:?}", output.status), &stderr));
    }

    Ok(())
}
