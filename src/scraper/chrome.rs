use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetLocaleOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::{RwLock, RwLockReadGuard, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::app::{NewsbriefError, Result};
use crate::config::HeaderProfile;
use crate::domain::FetchedPage;
use crate::scraper::config::RenderConfig;
use crate::scraper::Renderer;

/// A launched browser process and the task pumping its CDP events.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// Chrome-based page renderer using chromiumoxide.
///
/// The browser is launched on the first render and shared by every later
/// one; each render gets its own browser context so cookies and cache never
/// leak between requests. [`shutdown`](Renderer::shutdown) closes the process
/// once and makes further renders fail.
pub struct ChromeRenderer {
    config: RenderConfig,
    headers: HeaderProfile,
    session: RwLock<Option<BrowserSession>>,
    shut_down: AtomicBool,
    semaphore: Semaphore,
}

impl ChromeRenderer {
    /// Create a renderer; the browser is not launched until first use
    pub fn new(config: RenderConfig, headers: HeaderProfile) -> Self {
        let semaphore = Semaphore::new(config.max_concurrency.max(1));
        Self {
            config,
            headers,
            session: RwLock::new(None),
            shut_down: AtomicBool::new(false),
            semaphore,
        }
    }

    /// Shared access to the running browser, launching it if needed.
    async fn session(&self) -> Result<RwLockReadGuard<'_, Option<BrowserSession>>> {
        {
            let guard = self.session.read().await;
            if guard.is_some() {
                return Ok(guard);
            }
        }

        let mut guard = self.session.write().await;
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(NewsbriefError::Render(
                "renderer has been shut down".to_string(),
            ));
        }
        if guard.is_none() {
            *guard = Some(launch(&self.config).await?);
        }

        Ok(guard.downgrade())
    }

    async fn render_in_context(&self, browser: &Browser, url: &str) -> Result<FetchedPage> {
        let context_id = browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| NewsbriefError::Render(format!("Failed to create browser context: {}", e)))?
            .result
            .browser_context_id;

        let result = self.render_page(browser, context_id.clone(), url).await;

        if let Err(e) = browser
            .execute(DisposeBrowserContextParams::new(context_id))
            .await
        {
            warn!("Failed to dispose browser context: {}", e);
        }

        result
    }

    async fn render_page(
        &self,
        browser: &Browser,
        context_id: BrowserContextId,
        url: &str,
    ) -> Result<FetchedPage> {
        let mut target = CreateTargetParams::new("about:blank");
        target.browser_context_id = Some(context_id);

        let page = browser
            .new_page(target)
            .await
            .map_err(|e| NewsbriefError::Render(format!("Failed to create page: {}", e)))?;

        let result = self.load(&page, url).await;

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        result
    }

    async fn load(&self, page: &Page, url: &str) -> Result<FetchedPage> {
        let mut user_agent = SetUserAgentOverrideParams::new(self.headers.user_agent.clone());
        user_agent.accept_language = Some(self.headers.accept_language.clone());
        page.execute(user_agent)
            .await
            .map_err(|e| NewsbriefError::Render(format!("Failed to set user agent: {}", e)))?;

        let mut locale = SetLocaleOverrideParams::default();
        locale.locale = Some(self.headers.locale.clone());
        page.execute(locale)
            .await
            .map_err(|e| NewsbriefError::Render(format!("Failed to set locale: {}", e)))?;

        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            self.headers.browser_headers(),
        )))
        .await
        .map_err(|e| NewsbriefError::Render(format!("Failed to set headers: {}", e)))?;

        match tokio::time::timeout(self.config.navigation_timeout(), page.goto(url)).await {
            Err(_) => {
                return Err(NewsbriefError::Render(format!(
                    "navigation timed out after {}s",
                    self.config.navigation_timeout_secs
                )))
            }
            Ok(Err(e)) => {
                return Err(NewsbriefError::Render(format!("Navigation failed: {}", e)));
            }
            Ok(Ok(_)) => {}
        }

        // Additional wait for dynamic content
        tokio::time::sleep(self.config.settle()).await;

        let html = page
            .content()
            .await
            .map_err(|e| NewsbriefError::Render(format!("Failed to read page content: {}", e)))?;

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }
}

async fn launch(config: &RenderConfig) -> Result<BrowserSession> {
    let mut builder = BrowserConfig::builder()
        .arg("--no-sandbox")
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-software-rasterizer")
        .launch_timeout(config.launch_timeout());

    if !config.headless {
        builder = builder.with_head();
    }

    let browser_config = builder
        .build()
        .map_err(|e| NewsbriefError::Render(format!("Failed to build browser config: {}", e)))?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        NewsbriefError::Render(format!(
            "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
            e
        ))
    })?;

    let handler = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("Browser handler error: {}", e);
            }
        }
    });

    info!("Headless browser launched");
    Ok(BrowserSession { browser, handler })
}

#[async_trait]
impl Renderer for ChromeRenderer {
    #[instrument(level = "info", skip(self))]
    async fn render(&self, url: &str) -> Result<FetchedPage> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| NewsbriefError::Render(format!("Semaphore error: {}", e)))?;

        let guard = self.session().await?;
        let Some(session) = guard.as_ref() else {
            return Err(NewsbriefError::Render(
                "browser session unavailable".to_string(),
            ));
        };

        self.render_in_context(&session.browser, url).await
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);

        let session = self.session.write().await.take();
        let Some(mut session) = session else {
            return;
        };

        info!("Shutting down headless browser");

        if let Err(e) = session.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = session.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        session.handler.abort();
    }
}
