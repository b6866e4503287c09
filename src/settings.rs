//! Config-file support and CLI/config merging.
//!
//! Settings resolve once, before the pipeline is built: explicit `--config`
//! path, then a `skelgen.toml` in the current directory, then built-in
//! defaults. CLI flags override config-file values when present.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use skelgen_lib::{
    HeaderConfig, IncludeHook, InitHook, Result, SkelError, SkeletonConfig,
};

use crate::cli::Cli;

/// Default config file looked up in the working directory.
const CENTRAL_CONFIG: &str = "skelgen.toml";

/// TOML mirror of the data fields of [`SkeletonConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub inject_selector: Option<String>,
    pub background: Option<String>,
    pub animation: Option<String>,
    pub root_node: Option<String>,
    pub header: Option<HeaderConfig>,
    pub device: Option<String>,
    pub headless: Option<bool>,
    pub extra_http_headers: Option<HashMap<String, String>>,
    pub init: Option<InitHook>,
    pub include_element: Option<IncludeHook>,
    pub node_command: Option<String>,
    pub nav_timeout: Option<u64>,
    pub process_timeout: Option<u64>,
}

/// Load config from a TOML file or return defaults.
/// Priority: explicit path > ./skelgen.toml > defaults.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let central = PathBuf::from(CENTRAL_CONFIG);
            if !central.is_file() {
                return Ok(FileConfig::default());
            }
            central
        }
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        SkelError::validation(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&raw).map_err(|e| {
        SkelError::validation(format!("Invalid config ({}): {}", path.display(), e))
    })
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Merge CLI arguments with the config file into a [`SkeletonConfig`],
/// preferring CLI values when their flags are present.
pub fn build_config(cli: &Cli, raw_args: &[String], file: &FileConfig) -> SkeletonConfig {
    let url = cli
        .url
        .clone()
        .or_else(|| file.url.clone())
        .unwrap_or_default();

    let mut config = SkeletonConfig::new(url);

    config.output_path = cli.out.clone().or_else(|| file.output_path.clone());
    config.device = cli.device.clone().or_else(|| file.device.clone());

    if flag_present(raw_args, "--inject-selector") {
        config.inject_selector = cli.inject_selector.clone();
    } else if let Some(selector) = &file.inject_selector {
        config.inject_selector = selector.clone();
    }

    if flag_present(raw_args, "--background") {
        config.background = cli.background.clone();
    } else if let Some(background) = &file.background {
        config.background = background.clone();
    }

    if flag_present(raw_args, "--animation") {
        config.animation = cli.animation.clone();
    } else if let Some(animation) = &file.animation {
        config.animation = animation.clone();
    }

    if flag_present(raw_args, "--root-node") {
        config.root_node = cli.root_node.clone();
    } else if let Some(root_node) = &file.root_node {
        config.root_node = root_node.clone();
    }

    config.header = match cli.header_height {
        Some(height) => Some(HeaderConfig {
            height,
            background: cli.header_background.clone(),
        }),
        None => file.header.clone(),
    };

    config.headless = if cli.headed {
        false
    } else {
        file.headless.unwrap_or(true)
    };

    config.extra_http_headers = if cli.http_headers.is_empty() {
        file.extra_http_headers.clone()
    } else {
        Some(cli.http_headers.iter().cloned().collect())
    };

    config.init = if cli.hide_selectors.is_empty() {
        file.init.clone().unwrap_or_default()
    } else {
        InitHook::HideSelectors {
            selectors: cli.hide_selectors.clone(),
        }
    };

    config.include_element = if cli.exclude_selectors.is_empty() {
        file.include_element.clone().unwrap_or_default()
    } else {
        IncludeHook::ExcludeSelectors {
            selectors: cli.exclude_selectors.clone(),
        }
    };

    if let Some(node_command) = &file.node_command {
        config.node_command = node_command.clone();
    }

    config.navigation_timeout = if flag_present(raw_args, "--nav-timeout") {
        Duration::from_secs(cli.nav_timeout)
    } else {
        Duration::from_secs(file.nav_timeout.unwrap_or(cli.nav_timeout))
    };

    config.process_timeout = if flag_present(raw_args, "--process-timeout") {
        Duration::from_secs(cli.process_timeout)
    } else {
        Duration::from_secs(file.process_timeout.unwrap_or(cli.process_timeout))
    };

    config
}

/// Log the effective settings to stderr (verbose mode).
pub fn log_effective_config(config: &SkeletonConfig, config_path: Option<&Path>) {
    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults/built-in".to_string());
    eprintln!(
        "Effective config (source: {}): url {:?}, out {:?}, inject {:?}, background {}, device {:?}, headless {}, timeouts nav {}s / process {}s",
        source,
        config.url,
        config.output_path,
        config.inject_selector,
        config.background,
        config.device,
        config.headless,
        config.navigation_timeout.as_secs(),
        config.process_timeout.as_secs()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> (Cli, Vec<String>) {
        let raw: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        (Cli::parse_from(list), raw)
    }

    #[test]
    fn cli_flags_override_file_values() {
        let (cli, raw) = args(&[
            "skelgen",
            "--url",
            "https://cli.example.com",
            "--background",
            "#111",
            "--nav-timeout",
            "5",
        ]);
        let file = FileConfig {
            url: Some("https://file.example.com".to_string()),
            background: Some("#999".to_string()),
            nav_timeout: Some(40),
            ..FileConfig::default()
        };

        let config = build_config(&cli, &raw, &file);
        assert_eq!(config.url, "https://cli.example.com");
        assert_eq!(config.background, "#111");
        assert_eq!(config.navigation_timeout, Duration::from_secs(5));
    }

    #[test]
    fn file_values_apply_when_flags_absent() {
        let (cli, raw) = args(&["skelgen"]);
        let file = FileConfig {
            url: Some("https://file.example.com".to_string()),
            inject_selector: Some("#app".to_string()),
            headless: Some(false),
            nav_timeout: Some(12),
            init: Some(InitHook::ScrollToTop),
            ..FileConfig::default()
        };

        let config = build_config(&cli, &raw, &file);
        assert_eq!(config.url, "https://file.example.com");
        assert_eq!(config.inject_selector, "#app");
        assert!(!config.headless);
        assert_eq!(config.navigation_timeout, Duration::from_secs(12));
        assert_eq!(config.init, InitHook::ScrollToTop);
    }

    #[test]
    fn headed_flag_wins_over_file_headless() {
        let (cli, raw) = args(&["skelgen", "--url", "https://example.com", "--headed"]);
        let file = FileConfig {
            headless: Some(true),
            ..FileConfig::default()
        };
        let config = build_config(&cli, &raw, &file);
        assert!(!config.headless);
    }

    #[test]
    fn hide_selectors_build_an_init_hook() {
        let (cli, raw) = args(&[
            "skelgen",
            "--url",
            "https://example.com",
            "--hide-selector",
            ".toast",
        ]);
        let config = build_config(&cli, &raw, &FileConfig::default());
        assert_eq!(
            config.init,
            InitHook::HideSelectors {
                selectors: vec![".toast".to_string()]
            }
        );
    }

    #[test]
    fn header_flags_build_a_header_config() {
        let (cli, raw) = args(&[
            "skelgen",
            "--url",
            "https://example.com",
            "--header-height",
            "56",
            "--header-background",
            "#fff",
        ]);
        let config = build_config(&cli, &raw, &FileConfig::default());
        assert_eq!(
            config.header,
            Some(HeaderConfig {
                height: 56.0,
                background: Some("#fff".to_string())
            })
        );
    }

    #[test]
    fn load_file_config_parses_hooks_and_header() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("skelgen.toml");
        std::fs::write(
            &path,
            r##"
url = "https://example.com"
background = "#eee"

[header]
height = 48.0

[init]
kind = "hide-selectors"
selectors = [".ad"]

[include_element]
kind = "min-size"
width = 8.0
height = 4.0
"##,
        )
        .expect("write config");

        let file = load_file_config(Some(&path)).expect("load");
        assert_eq!(file.url.as_deref(), Some("https://example.com"));
        assert_eq!(file.header.as_ref().map(|h| h.height), Some(48.0));
        assert_eq!(
            file.init,
            Some(InitHook::HideSelectors {
                selectors: vec![".ad".to_string()]
            })
        );
        assert_eq!(
            file.include_element,
            Some(IncludeHook::MinSize {
                width: 8.0,
                height: 4.0
            })
        );
    }

    #[test]
    fn load_file_config_rejects_unknown_fields() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("skelgen.toml");
        std::fs::write(&path, "not_a_setting = true\n").expect("write config");

        let err = load_file_config(Some(&path)).expect_err("unknown field");
        assert!(err.is_validation(), "got: {err:?}");
    }

    #[test]
    fn load_file_config_errors_on_missing_explicit_path() {
        let err =
            load_file_config(Some(Path::new("/definitely/missing.toml"))).expect_err("missing");
        assert!(err.is_validation(), "got: {err:?}");
    }
}
