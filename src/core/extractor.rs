use crate::config::{ScraperConfig, SelectorSet, SelectorTable};
use crate::domain::model::{PlatformKind, ProductDetails};
use crate::domain::ports::BrowserPage;
use crate::utils::error::ExtractError;
use std::time::Duration;
use tokio::time::timeout;

/// 依平台挑選擇器，導航後讀出價格與優惠文字
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: SelectorTable,
    navigation_timeout: Duration,
    selector_timeout: Duration,
}

impl Extractor {
    pub fn new(selectors: SelectorTable) -> Self {
        Self {
            selectors,
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.selectors.clone()).with_timeouts(
            config.browser.navigation_timeout(),
            config.browser.selector_timeout(),
        )
    }

    pub fn with_timeouts(mut self, navigation: Duration, selector: Duration) -> Self {
        self.navigation_timeout = navigation;
        self.selector_timeout = selector;
        self
    }

    pub async fn extract<P: BrowserPage>(
        &self,
        page: &P,
        platform: PlatformKind,
        url: &str,
    ) -> Result<ProductDetails, ExtractError> {
        match platform {
            PlatformKind::Amazon => self.scrape(page, url, &self.selectors.amazon).await,
            PlatformKind::Flipkart => self.scrape(page, url, &self.selectors.flipkart).await,
            PlatformKind::Croma => self.scrape(page, url, &self.selectors.croma).await,
            PlatformKind::RelianceDigital => {
                self.scrape(page, url, &self.selectors.reliance_digital).await
            }
            PlatformKind::Unknown => Err(ExtractError::UnsupportedPlatform),
        }
    }

    async fn scrape<P: BrowserPage>(
        &self,
        page: &P,
        url: &str,
        selectors: &SelectorSet,
    ) -> Result<ProductDetails, ExtractError> {
        self.navigate(page, url).await?;

        self.wait_for(page, &selectors.price).await?;
        let price = page.inner_text(&selectors.price).await?;

        // 優惠區塊不是每個商品都有，等不到就用預設文字
        let offer = match &selectors.offer {
            Some(offer_selector) => match self.wait_for(page, offer_selector).await {
                Ok(()) => page.inner_text(offer_selector).await?,
                Err(e @ ExtractError::SelectorTimeout { .. }) => {
                    tracing::debug!("Offer not found on {}: {}", url, e);
                    None
                }
                Err(e) => {
                    tracing::warn!("Offer lookup failed on {}: {}", url, e);
                    None
                }
            },
            None => None,
        };

        Ok(ProductDetails {
            price: price.map(|text| text.trim().to_string()),
            offer: offer.map(|text| text.trim().to_string()),
        })
    }

    async fn navigate<P: BrowserPage>(&self, page: &P, url: &str) -> Result<(), ExtractError> {
        tracing::debug!("Navigating to {}", url);
        match timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractError::Navigation {
                url: url.to_string(),
                message: format!(
                    "timed out after {}s",
                    self.navigation_timeout.as_secs_f64()
                ),
            }),
        }
    }

    async fn wait_for<P: BrowserPage>(&self, page: &P, selector: &str) -> Result<(), ExtractError> {
        match timeout(self.selector_timeout, page.wait_for_selector(selector)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractError::SelectorTimeout {
                selector: selector.to_string(),
                timeout: self.selector_timeout,
            }),
        }
    }
}
