//! # browser: chromium-backed implementation of the capture contract
//!
//! Drives a headless chromium over CDP. One [`ChromiumBrowser`] context is
//! shared across all capture jobs; each job opens its own page with CSP
//! bypassed so the injected serializer can run on any origin.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, SetBypassCspParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::contract::{Browser, CaptureError, Page};

const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Shared browser-level context. Launches chromium with web security
/// disabled (the share pages are cross-origin to the injected tooling) and
/// pumps the CDP event handler on a background task.
pub struct ChromiumBrowser {
    browser: chromiumoxide::Browser,
    handler_task: JoinHandle<()>,
}

impl ChromiumBrowser {
    pub async fn launch() -> Result<Self, CaptureError> {
        let config = BrowserConfig::builder()
            .arg("--disable-web-security")
            .build()
            .map_err(CaptureError::Navigation)?;

        let (browser, mut handler) = chromiumoxide::Browser::launch(config)
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;

        let handler_task = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = ?e, "CDP handler stopped");
                    break;
                }
            }
        });

        debug!("Launched chromium browser context");
        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Shut the browser down and join the handler task.
    pub async fn close(mut self) -> Result<(), CaptureError> {
        self.browser
            .close()
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        let _ = self.handler_task.await;
        Ok(())
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn open_page(&self) -> Result<Box<dyn Page>, CaptureError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        page.execute(SetBypassCspParams::new(true))
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        Ok(Box::new(ChromiumPage { page }))
    }
}

struct ChromiumPage {
    page: chromiumoxide::Page,
}

#[async_trait]
impl Page for ChromiumPage {
    async fn inject_script(&self, source: &str) -> Result<(), CaptureError> {
        self.page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(
                source.to_string(),
            ))
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<(), CaptureError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CaptureError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let probe = format!(
            "document.querySelector({}) !== null",
            serde_json::json!(selector)
        );
        loop {
            // Probe errors count as "not there yet"; the deadline bounds
            // a page that never becomes scriptable.
            let found = matches!(
                self.evaluate(&probe).await,
                Ok(value) if value.as_bool().unwrap_or(false)
            );
            if found {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(CaptureError::Timeout {
                    selector: selector.to_string(),
                });
            }
            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }

    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, CaptureError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(CaptureError::Extraction)?;
        let result = self
            .page
            .evaluate(params)
            .await
            .map_err(|e| CaptureError::Extraction(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn close(&self) -> Result<(), CaptureError> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        Ok(())
    }
}
