use crate::config::BrowserSettings;
use crate::domain::ports::{BrowserLauncher, BrowserPage, BrowserSession};
use crate::utils::error::{ExtractError, Result, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);
const HANDLER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// 透過 CDP 啟動本機 Chrome/Chromium
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder =
            BrowserConfig::builder().request_timeout(self.settings.navigation_timeout());

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }
        if let Some(user_agent) = &self.settings.user_agent {
            builder = builder.arg(format!("--user-agent={}", user_agent));
        }

        builder
            .build()
            .map_err(|message| ScrapeError::BrowserLaunchError { message })
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession> {
        let config = self.browser_config()?;
        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ScrapeError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

        // CDP 事件迴圈必須一直被 poll，連線關閉時才會結束
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {}", e);
                }
            }
        });

        tracing::info!(
            "🌐 Browser launched (headless: {})",
            self.settings.headless
        );
        Ok(ChromiumSession {
            browser,
            handler_task,
        })
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&self) -> std::result::Result<ChromiumPage, ExtractError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(ExtractError::page)?;
        Ok(ChromiumPage { page })
    }

    async fn close(self) -> Result<()> {
        let ChromiumSession {
            mut browser,
            mut handler_task,
        } = self;

        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ScrapeError::BrowserCloseError {
                message: e.to_string(),
            });
        if let Err(e) = browser.wait().await {
            tracing::debug!("Waiting for browser process failed: {}", e);
        }

        if tokio::time::timeout(HANDLER_SHUTDOWN_GRACE, &mut handler_task)
            .await
            .is_err()
        {
            handler_task.abort();
        }

        tracing::info!("🧹 Browser closed");
        closed
    }
}

pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> std::result::Result<(), ExtractError> {
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| ExtractError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn wait_for_selector(&self, selector: &str) -> std::result::Result<(), ExtractError> {
        // CDP 沒有 wait-for-selector，用輪詢代替
        poll_for_match(SELECTOR_POLL_INTERVAL, || async {
            self.page
                .find_elements(selector)
                .await
                .map(|elements| elements.len())
        })
        .await
    }

    async fn inner_text(&self, selector: &str) -> std::result::Result<Option<String>, ExtractError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(ExtractError::page)?;

        match elements.first() {
            Some(element) => element.inner_text().await.map_err(ExtractError::page),
            None => Ok(None),
        }
    }

    async fn close(self) -> std::result::Result<(), ExtractError> {
        self.page.close().await.map_err(ExtractError::page)
    }
}

/// 一直輪詢到至少有一個符合的元素。
/// 查詢本身失敗 (選擇器語法錯誤、分頁已關閉、CDP 斷線) 立即回錯，不等到逾時。
async fn poll_for_match<F, Fut, E>(
    interval: Duration,
    mut count_matches: F,
) -> std::result::Result<(), ExtractError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<usize, E>>,
    E: Display,
{
    loop {
        match count_matches().await {
            Ok(0) => tokio::time::sleep(interval).await,
            Ok(_) => return Ok(()),
            Err(e) => return Err(ExtractError::page(e)),
        }
    }
}
