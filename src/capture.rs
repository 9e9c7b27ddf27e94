//! # capture: the snapshot pipeline
//!
//! Turns one live shared conversation into a minimal, portable,
//! self-contained HTML artifact. Stages run in a fixed order, each a hard
//! dependency on the previous one succeeding: inject scripts, navigate,
//! wait for readiness, expand truncated content, extract title and math
//! flag, strip volatile page chrome, serialize through the injected
//! single-file library, post-process the serialized text, and build the
//! archive filename. The page resource is released on every exit path.

use tracing::{debug, warn};

use crate::config::CaptureConfig;
use crate::contract::{Artifact, Browser, CaptureError, ConversationId, Page};
use crate::postprocess;
use crate::store;

/// Clicks every visible "Show"/"More" toggle so truncated content (e.g.
/// reasoning steps, Deep Research sections) is rendered before capture.
const EXPAND_TOGGLES_SCRIPT: &str = r#"
(() => {
  const labels = new Set(["Show", "More"]);
  for (const el of document.querySelectorAll("button, [role='button']")) {
    if (labels.has((el.textContent || "").trim())) el.click();
  }
})()
"#;

// Some shared conversations have no title at all; coalesce to "".
const TITLE_SCRIPT: &str =
    r#"document.querySelector("h1 > strong")?.textContent ?? """#;

const MATH_PROBE_SCRIPT: &str =
    r#"document.getElementsByClassName("katex").length > 0"#;

/// One-shot, irreversible DOM cleanup. Every removal is best-effort: a
/// missing element is expected, not an error. Icon-font elements are
/// replaced by externally-hosted SVGs sized to their computed font size,
/// since the icon font itself is heavy and gets pruned later.
const CLEANUP_SCRIPT: &str = r#"
(() => {
  // Top bar ("About Gemini" etc.)
  document.getElementsByTagName("top-bar-actions")[0]?.remove();

  // Sign-in bar and landing footer
  document.getElementsByClassName("boqOnegoogleliteOgbOneGoogleBar")[0]?.remove();
  document.getElementsByClassName("share-landing-page_footer")[0]?.remove();

  // Copy and flag buttons
  for (const matButton of document.querySelectorAll("[mat-icon-button]")) matButton.remove();

  // Swap each icon-font glyph for the equivalent hosted SVG
  const matIcons = document.getElementsByTagName("mat-icon");
  while (matIcons.length > 0) {
    const matIcon = matIcons[0];
    const iconName = matIcon.getAttribute("fonticon");
    const size = getComputedStyle(matIcon).fontSize;

    const img = document.createElement("img");
    img.src = `https://fonts.gstatic.com/s/i/short-term/release/materialsymbolsoutlined/${iconName}/default/${size}.svg`;
    matIcon.insertAdjacentElement("afterend", img);
    matIcon.remove();
  }

  // Disclaimer and legal links
  document.getElementsByClassName("share-viewer_footer_disclaimer")[0]?.remove();
  const legalLinks = document.getElementsByClassName("share-viewer_legal-links")[0];
  if (legalLinks) {
    legalLinks.style.paddingTop = "0";
    while (legalLinks.children.length > 0) legalLinks.children[0].remove();
  }

  // Script tags
  const scriptTags = document.getElementsByTagName("script");
  while (scriptTags.length > 0) scriptTags[0].remove();

  // Drop inline styles declaring custom properties, so the later
  // dead-variable pruning only has stylesheet text to reason about.
  for (const el of document.querySelectorAll("[style]")) {
    if (el.getAttribute("style").includes("--")) el.removeAttribute("style");
  }
})()
"#;

/// Runs the staged snapshot pipeline against a page-level resource obtained
/// from the shared browser context.
pub struct Capturer {
    config: CaptureConfig,
}

impl Capturer {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Capture one conversation into a finished [`Artifact`].
    ///
    /// Opens and exclusively owns one page, and closes it whether the
    /// pipeline succeeded or failed.
    pub async fn capture<B>(
        &self,
        browser: &B,
        id: &ConversationId,
    ) -> Result<Artifact, CaptureError>
    where
        B: Browser + ?Sized,
    {
        let page = browser.open_page().await?;
        let result = self.capture_on_page(page.as_ref(), id).await;
        // A close failure must not mask the pipeline result.
        if let Err(e) = page.close().await {
            warn!(id = %id, error = %e, "Failed to close page after capture");
        }
        result
    }

    async fn capture_on_page(
        &self,
        page: &dyn Page,
        id: &ConversationId,
    ) -> Result<Artifact, CaptureError> {
        let url = self.config.share_url(id);

        // Both payloads must be registered before navigation; the serializer
        // depends on the hook observing the page from the first script tick.
        page.inject_script(&self.config.scripts.hook).await?;
        page.inject_script(&self.config.scripts.page).await?;
        page.navigate(&url).await?;
        debug!(id = %id, url = %url, "Navigated to shared conversation");

        page.wait_for_element(&self.config.ready_selector, self.config.ready_timeout)
            .await?;
        // Late-arriving async content has no readiness signal; give it a
        // fixed, configurable settle window.
        tokio::time::sleep(self.config.settle_delay).await;

        page.evaluate(EXPAND_TOGGLES_SCRIPT).await?;

        let title = page
            .evaluate(TITLE_SCRIPT)
            .await?
            .as_str()
            .unwrap_or_default()
            .to_string();
        let has_math = page
            .evaluate(MATH_PROBE_SCRIPT)
            .await?
            .as_bool()
            .unwrap_or(false);
        debug!(id = %id, title = %title, has_math, "Extracted page metadata");

        page.evaluate(CLEANUP_SCRIPT).await?;

        let serialized = self.serialize(page).await?;
        let content = postprocess::minimise(&serialized, has_math);
        let filename = store::snapshot_filename(id, &title);

        debug!(
            id = %id,
            filename = %filename,
            serialized_bytes = serialized.len(),
            final_bytes = content.len(),
            "Capture pipeline finished"
        );
        Ok(Artifact { filename, content })
    }

    /// Invoke the injected serializer and return the inlined HTML document.
    async fn serialize(&self, page: &dyn Page) -> Result<String, CaptureError> {
        let options = serde_json::json!({
            "zipScript": self.config.scripts.zip,
            "removeUnusedStyles": true,
            "removeUnusedFonts": true,
            "removeFrames": true,
            "insertSingleFileComment": true,
        });
        let expression =
            format!("(async () => (await singlefile.getPageData({options})))()");

        let value = page.evaluate(&expression).await?;
        let content = value
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                CaptureError::Extraction("serializer returned no content field".to_string())
            })?;
        Ok(content.to_string())
    }
}
