//! Bundled default HTML document.
//!
//! Used both as the seed file when the output path names a directory and as
//! the fallback page when no output destination was configured.

/// Minimal page the generated skeleton gets injected into.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no">
  <title>skeleton</title>
  <style>
    html, body { margin: 0; padding: 0; }
    #skeleton { position: relative; width: 100%; min-height: 100vh; overflow: hidden; }
  </style>
</head>
<body>
  <div id="skeleton"></div>
</body>
</html>
"#;
