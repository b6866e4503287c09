use std::fs;
use std::process::Command;

use scraper::{Html, Selector};
use tempfile::TempDir;

const MOCK_FRAGMENT: &str = r#"<div id="skeleton"><div style="width:10px"></div></div>"#;

fn skelgen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_skelgen"));
    // Keep runs hermetic even when the host has no node/playwright.
    cmd.env("SKELGEN_MOCK_HTML", MOCK_FRAGMENT);
    cmd
}

fn body_inner(document: &str) -> String {
    let doc = Html::parse_document(document);
    let sel = Selector::parse("body").expect("selector");
    doc.select(&sel)
        .next()
        .map(|el| el.inner_html())
        .unwrap_or_default()
}

#[test]
fn missing_url_exits_with_validation_code() {
    let dir = TempDir::new().expect("tempdir");
    let status = skelgen()
        .current_dir(dir.path())
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn nonexistent_output_path_exits_with_validation_code() {
    let dir = TempDir::new().expect("tempdir");
    let status = skelgen()
        .current_dir(dir.path())
        .args(["--url", "https://example.com", "--out", "missing/out.html"])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn invalid_inject_selector_exits_with_validation_code() {
    let dir = TempDir::new().expect("tempdir");
    let status = skelgen()
        .current_dir(dir.path())
        .args(["--url", "https://example.com", "--inject-selector", ":::"])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn invalid_config_file_exits_with_validation_code() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("skelgen.toml");
    fs::write(&cfg, "url = 42\n").expect("write config");

    let status = skelgen()
        .current_dir(dir.path())
        .args(["--config", cfg.to_str().unwrap()])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn existing_file_output_receives_fragment() {
    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("out.html");
    fs::write(&out, "<html><body></body></html>").expect("write");

    let status = skelgen()
        .current_dir(dir.path())
        .args(["--url", "https://example.com", "--out", "out.html"])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(0));

    let written = fs::read_to_string(&out).expect("read");
    assert_eq!(body_inner(&written), MOCK_FRAGMENT);
}

#[test]
fn directory_output_creates_seeded_index_html() {
    let dir = TempDir::new().expect("tempdir");
    let out_dir = dir.path().join("dist");
    fs::create_dir(&out_dir).expect("mkdir");

    let status = skelgen()
        .current_dir(dir.path())
        .args(["--url", "https://example.com", "--out", "dist"])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(0));

    let written = fs::read_to_string(out_dir.join("index.html")).expect("read");
    assert!(written.contains(MOCK_FRAGMENT));
    // The seed template's own mount point is still there.
    assert!(written.contains("skeleton"));
}

#[test]
fn no_output_path_falls_back_to_default_page_in_cwd() {
    let dir = TempDir::new().expect("tempdir");

    let status = skelgen()
        .current_dir(dir.path())
        .args(["--url", "https://example.com"])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(0));

    let written = fs::read_to_string(dir.path().join("index.html")).expect("read");
    assert!(written.contains(MOCK_FRAGMENT));
}

#[test]
fn custom_inject_selector_targets_the_right_element() {
    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("out.html");
    fs::write(
        &out,
        "<html><body><div id=\"mount\"><p>old</p></div></body></html>",
    )
    .expect("write");

    let status = skelgen()
        .current_dir(dir.path())
        .args([
            "--url",
            "https://example.com",
            "--out",
            "out.html",
            "--inject-selector",
            "#mount",
        ])
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(0));

    let written = fs::read_to_string(&out).expect("read");
    let doc = Html::parse_document(&written);
    let mount = Selector::parse("#mount").expect("selector");
    assert_eq!(
        doc.select(&mount).next().map(|el| el.inner_html()),
        Some(MOCK_FRAGMENT.to_string())
    );
}

#[test]
fn script_failure_still_writes_output_with_content_preserved() {
    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("out.html");
    fs::write(&out, "<html><body><p>keep</p></body></html>").expect("write");

    let status = skelgen()
        .current_dir(dir.path())
        .env_remove("SKELGEN_MOCK_HTML")
        .env("SKELGEN_MOCK_SCRIPT_ERROR", "evaluate failed")
        .args(["--url", "https://example.com", "--out", "out.html"])
        .status()
        .expect("run skelgen");
    // Script failure is recovered, not fatal.
    assert_eq!(status.code(), Some(0));

    let written = fs::read_to_string(&out).expect("read");
    assert_eq!(body_inner(&written), "<p>keep</p>");
}

#[test]
fn config_file_supplies_url_and_output() {
    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("page.html");
    fs::write(&out, "<html><body></body></html>").expect("write");
    fs::write(
        dir.path().join("skelgen.toml"),
        "url = \"https://example.com\"\noutput_path = \"page.html\"\n",
    )
    .expect("write config");

    let status = skelgen()
        .current_dir(dir.path())
        .status()
        .expect("run skelgen");
    assert_eq!(status.code(), Some(0));

    let written = fs::read_to_string(&out).expect("read");
    assert_eq!(body_inner(&written), MOCK_FRAGMENT);
}
