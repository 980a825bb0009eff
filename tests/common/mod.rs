#![allow(dead_code)]

use async_trait::async_trait;
use price_scrape::config::{SelectorSet, SelectorTable};
use price_scrape::core::{BrowserLauncher, BrowserPage, BrowserSession};
use price_scrape::{ExtractError, Extractor, ScrapeError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const AMAZON_PRICE: &str = "#amazon-price";
pub const FLIPKART_PRICE: &str = "#flipkart-price";
pub const FLIPKART_OFFER: &str = "#flipkart-offer";
pub const CROMA_PRICE: &str = "#croma-price";
pub const RELIANCE_PRICE: &str = "#reliance-price";

/// 模擬一個商品頁：導航延遲、導航錯誤、頁面上有哪些元素
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    pub delay: Duration,
    pub navigation_error: Option<String>,
    // None 代表 wait 成功但讀取時元素已消失
    pub elements: HashMap<String, Option<String>>,
}

impl PageScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, selector: &str, text: &str) -> Self {
        self.elements
            .insert(selector.to_string(), Some(text.to_string()));
        self
    }

    pub fn vanishing(mut self, selector: &str) -> Self {
        self.elements.insert(selector.to_string(), None);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn navigation_error(mut self, message: &str) -> Self {
        self.navigation_error = Some(message.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub struct BrowserStats {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub open_pages: AtomicUsize,
    pub max_open_pages: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
}

impl BrowserStats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }

    pub fn max_open_pages(&self) -> usize {
        self.max_open_pages.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    pages: Arc<HashMap<String, PageScript>>,
    pub stats: Arc<BrowserStats>,
    fail_launch: bool,
}

impl ScriptedLauncher {
    pub fn new(pages: Vec<(&str, PageScript)>) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(url, script)| (url.to_string(), script))
                    .collect(),
            ),
            stats: Arc::new(BrowserStats::default()),
            fail_launch: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedLauncher {
    type Session = ScriptedSession;

    async fn launch(&self) -> price_scrape::Result<ScriptedSession> {
        if self.fail_launch {
            return Err(ScrapeError::BrowserLaunchError {
                message: "Could not auto detect a chrome executable".to_string(),
            });
        }
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            pages: self.pages.clone(),
            stats: self.stats.clone(),
        })
    }
}

pub struct ScriptedSession {
    pages: Arc<HashMap<String, PageScript>>,
    stats: Arc<BrowserStats>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    type Page = ScriptedPage;

    async fn new_page(&self) -> Result<ScriptedPage, ExtractError> {
        self.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        let open = self.stats.open_pages.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_open_pages.fetch_max(open, Ordering::SeqCst);

        Ok(ScriptedPage {
            pages: self.pages.clone(),
            stats: self.stats.clone(),
            current: Mutex::new(None),
        })
    }

    async fn close(self) -> price_scrape::Result<()> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct ScriptedPage {
    pages: Arc<HashMap<String, PageScript>>,
    stats: Arc<BrowserStats>,
    current: Mutex<Option<PageScript>>,
}

impl ScriptedPage {
    fn element(&self, selector: &str) -> Option<Option<String>> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|page| page.elements.get(selector).cloned())
    }
}

#[async_trait]
impl BrowserPage for ScriptedPage {
    async fn goto(&self, url: &str) -> Result<(), ExtractError> {
        self.stats.navigations.lock().unwrap().push(url.to_string());
        let script = self.pages.get(url).cloned().unwrap_or_default();

        tokio::time::sleep(script.delay).await;
        if let Some(message) = &script.navigation_error {
            return Err(ExtractError::Navigation {
                url: url.to_string(),
                message: message.clone(),
            });
        }

        *self.current.lock().unwrap() = Some(script);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<(), ExtractError> {
        if self.element(selector).is_some() {
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    async fn inner_text(&self, selector: &str) -> Result<Option<String>, ExtractError> {
        Ok(self.element(selector).flatten())
    }

    async fn close(self) -> Result<(), ExtractError> {
        self.stats.pages_closed.fetch_add(1, Ordering::SeqCst);
        self.stats.open_pages.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_selectors() -> SelectorTable {
    SelectorTable {
        amazon: SelectorSet {
            price: AMAZON_PRICE.to_string(),
            offer: None,
        },
        flipkart: SelectorSet {
            price: FLIPKART_PRICE.to_string(),
            offer: Some(FLIPKART_OFFER.to_string()),
        },
        croma: SelectorSet {
            price: CROMA_PRICE.to_string(),
            offer: None,
        },
        reliance_digital: SelectorSet {
            price: RELIANCE_PRICE.to_string(),
            offer: None,
        },
    }
}

pub fn test_extractor() -> Extractor {
    Extractor::new(test_selectors())
        .with_timeouts(Duration::from_secs(2), Duration::from_millis(100))
}
