//! Embedded JavaScript sources for the Playwright helper.
//!
//! The runner launches Chromium, navigates, evaluates the skeleton builder
//! inside the page context, and reports a single JSON line on stdout. The
//! builder receives its hook sources and style values as data because the
//! page context cannot share closures with the host process; hooks are
//! revived with `new Function` inside the page.

/// Helper argv layout (after `node -e <script>`):
/// `url headless device headersJSON navTimeoutMs initSource includeSource
///  background animation rootNode headerJSON`.
pub(crate) const RUNNER_SCRIPT: &str = r#"
const [, url, headlessFlag, deviceName, headersJson, navTimeout,
       initSource, includeSource, background, animation, rootNode, headerJson] = process.argv;

const buildSkeleton = (args) => {
  const revive = (src) => {
    try { return (new Function('return (' + src + ')'))(); } catch (e) { return () => {}; }
  };
  const initFn = revive(args.init);
  const includeFn = revive(args.includeElement);

  initFn();

  const root = args.rootNode ? document.querySelector(args.rootNode) : document.body;
  if (!root) throw new Error('root node not found: ' + args.rootNode);
  const rootRect = root.getBoundingClientRect();

  const LEAF_TAGS = ['img', 'svg', 'video', 'canvas', 'picture', 'input',
                     'textarea', 'select', 'button', 'hr'];
  const blocks = [];

  const walk = (el) => {
    if (el.nodeType !== Node.ELEMENT_NODE) return;
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    if (rect.width <= 0 || rect.height <= 0) return;
    if (style.display === 'none' || style.visibility === 'hidden') return;
    if (parseFloat(style.opacity || '1') === 0) return;
    if (includeFn(el) === false) return;

    const tag = el.tagName.toLowerCase();
    const leaf = el.childElementCount === 0 || LEAF_TAGS.includes(tag);
    const hasOwnText = !leaf && Array.from(el.childNodes).some(
      (n) => n.nodeType === Node.TEXT_NODE && n.textContent.trim()
    );

    if (leaf || hasOwnText) {
      blocks.push({
        x: rect.left - rootRect.left,
        y: rect.top - rootRect.top,
        width: rect.width,
        height: rect.height,
        radius: style.borderRadius
      });
      if (leaf) return;
    }
    for (const child of el.children) walk(child);
  };
  walk(root);

  const px = (n) => Math.round(n * 100) / 100 + 'px';
  const container = document.createElement('div');
  container.id = 'skeleton';
  container.style.cssText =
    'position:relative;width:100%;height:' + px(Math.max(rootRect.height, 0)) + ';overflow:hidden;';
  if (args.animation) container.style.animation = args.animation;

  if (args.header) {
    const header = JSON.parse(args.header);
    const bar = document.createElement('div');
    bar.style.cssText =
      'position:absolute;left:0;top:0;width:100%;height:' + px(header.height) +
      ';background:' + (header.background || args.background) + ';';
    container.appendChild(bar);
  }

  for (const block of blocks) {
    const div = document.createElement('div');
    div.style.cssText =
      'position:absolute;left:' + px(block.x) + ';top:' + px(block.y) +
      ';width:' + px(block.width) + ';height:' + px(block.height) +
      ';background:' + args.background +
      ';border-radius:' + (block.radius || '0') + ';';
    container.appendChild(div);
  }

  return container.outerHTML;
};

async function run() {
  let browser;
  try {
    const { chromium, devices } = require('playwright');
    const headless = headlessFlag !== '0';
    browser = await chromium.launch({ headless });

    const contextOptions = {};
    if (deviceName) {
      const device = devices[deviceName];
      if (!device) throw new Error('unknown device: ' + deviceName);
      Object.assign(contextOptions, device);
    }
    if (headersJson) {
      contextOptions.extraHTTPHeaders = JSON.parse(headersJson);
    }

    const context = await browser.newContext(contextOptions);
    const page = await context.newPage();
    await page.goto(url, { waitUntil: 'networkidle', timeout: parseInt(navTimeout, 10) });

    let html = '';
    let scriptError = null;
    try {
      html = await page.evaluate(buildSkeleton, {
        init: initSource,
        includeElement: includeSource,
        background,
        animation,
        rootNode,
        header: headerJson
      });
    } catch (err) {
      scriptError = err && err.message ? err.message : String(err);
    }

    console.log(JSON.stringify({ status: 'ok', html, scriptError }));

    if (headless) {
      await browser.close();
    }
    // Headed: the open browser connection keeps this process alive so the
    // user can inspect the page; closing the browser ends the run.
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Script to check if Playwright is installed.
pub(crate) const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";
