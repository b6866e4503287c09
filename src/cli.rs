use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skelgen")]
#[command(
    version,
    about = "Skeleton screen generator - render a page and synthesize a loading placeholder from its real layout",
    long_about = "skelgen\n\nRenders the given URL in a headless browser, builds a skeleton-screen\nplaceholder from the page's real layout, and injects it into an HTML file.\n\nOutput resolution, in priority order: --out file, --out directory (a seeded\nindex.html is created inside it), or a default index.html in the current\ndirectory."
)]
pub struct Cli {
    #[arg(long, help = "Entry URL of the page to render")]
    pub url: Option<String>,

    #[arg(
        long,
        short,
        value_name = "PATH",
        help = "Output file or existing directory; relative to the current directory"
    )]
    pub out: Option<PathBuf>,

    #[arg(
        long,
        default_value = "body",
        help = "CSS selector of the element whose content receives the skeleton"
    )]
    pub inject_selector: String,

    #[arg(long, default_value = "#ecf0f2", help = "Placeholder block color")]
    pub background: String,

    #[arg(
        long,
        default_value = "",
        help = "CSS animation value applied to the skeleton container"
    )]
    pub animation: String,

    #[arg(
        long,
        default_value = "",
        help = "Selector of the DOM walk root (defaults to body)"
    )]
    pub root_node: String,

    #[arg(long, value_name = "PX", help = "Draw a header bar of this height")]
    pub header_height: Option<f64>,

    #[arg(
        long,
        value_name = "COLOR",
        help = "Header bar color (defaults to the placeholder color)"
    )]
    pub header_background: Option<String>,

    #[arg(
        long,
        help = "Playwright device name for emulation (e.g. \"iPhone 13\")"
    )]
    pub device: Option<String>,

    #[arg(long, help = "Run with a visible browser window and keep it open")]
    pub headed: bool,

    #[arg(
        long = "http-header",
        value_name = "KEY=VALUE",
        value_parser = parse_key_val,
        help = "Extra HTTP header sent with page requests (repeatable)"
    )]
    pub http_headers: Vec<(String, String)>,

    #[arg(
        long = "hide-selector",
        value_name = "SELECTOR",
        help = "Remove matching elements before the DOM walk (repeatable)"
    )]
    pub hide_selectors: Vec<String>,

    #[arg(
        long = "exclude-selector",
        value_name = "SELECTOR",
        help = "Skip matching elements when drawing placeholders (repeatable)"
    )]
    pub exclude_selectors: Vec<String>,

    #[arg(
        long,
        default_value = "30",
        help = "Navigation timeout (seconds)"
    )]
    pub nav_timeout: u64,

    #[arg(
        long,
        default_value = "60",
        help = "Timeout (seconds) for the whole browser helper process"
    )]
    pub process_timeout: u64,

    #[arg(
        long,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults; CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.trim().is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

pub fn parse() -> Cli {
    Cli::parse()
}
