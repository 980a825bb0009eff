#[cfg(feature = "cli")]
pub mod cli;

use crate::core::resolver::ensure_full_url;
use crate::domain::model::{PlatformKind, ScrapeRequest};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CSV_PATH: &str = "scraped_product_details.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub browser: BrowserSettings,
    pub selectors: SelectorTable,
    pub output: OutputConfig,
    pub server: ServerConfig,
    pub items: Vec<ItemConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub executable: Option<String>,
    pub no_sandbox: bool,
    pub navigation_timeout_secs: u64,
    pub selector_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            no_sandbox: false,
            navigation_timeout_secs: 30,
            selector_timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl BrowserSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }
}

/// 單一平台的選擇器；offer 可省略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    pub price: String,
    #[serde(default)]
    pub offer: Option<String>,
}

impl SelectorSet {
    fn price_only(price: &str) -> Self {
        Self {
            price: price.to_string(),
            offer: None,
        }
    }
}

/// 網站改版就會失效，所以放在設定檔而非程式碼裡
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorTable {
    pub amazon: SelectorSet,
    pub flipkart: SelectorSet,
    pub croma: SelectorSet,
    pub reliance_digital: SelectorSet,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            amazon: SelectorSet::price_only(
                "#corePriceDisplay_desktop_feature_div > div.a-section.a-spacing-none.aok-align-center.aok-relative",
            ),
            flipkart: SelectorSet {
                price: "#container > div > div._39kFie.N3De93.JxFEK3._48O0EI > div.DOjaWF.YJG4Cf > div.DOjaWF.gdgoEp.col-8-12 > div:nth-child(2) > div".to_string(),
                offer: Some(
                    "#container > div > div._39kFie.N3De93.JxFEK3._48O0EI > div.DOjaWF.YJG4Cf > div.DOjaWF.gdgoEp.col-8-12 > div:nth-child(3)".to_string(),
                ),
            },
            croma: SelectorSet::price_only(
                "#pdpdatael > div.cp-section.banner-spacing.show-pdp-icon > div.container > div > div > div > div.col-md-6.right-alignElement > div > ul > li.info-item.item-space-reduce",
            ),
            reliance_digital: SelectorSet::price_only(
                "#root > main > div.pb__20 > div > section.pdpStickyContainer > div.blk__sm__7.flush__left.pdp__topBlock > div:nth-child(2) > div.TextWeb__Text-sc-1cyx778-0.cXyRgU.Block-sc-u1lygz-0.gzqHuV.blk__sm__5.flush__left.flush__right.hideOverFlow.mt__16 > div.TextWeb__Text-sc-1cyx778-0.cXyRgU.Block-sc-u1lygz-0.gFTZAm > ul",
            ),
        }
    }
}

impl SelectorTable {
    pub fn for_platform(&self, platform: PlatformKind) -> Option<&SelectorSet> {
        match platform {
            PlatformKind::Amazon => Some(&self.amazon),
            PlatformKind::Flipkart => Some(&self.flipkart),
            PlatformKind::Croma => Some(&self.croma),
            PlatformKind::RelianceDigital => Some(&self.reliance_digital),
            PlatformKind::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    pub urls: Vec<String>,
}

impl ScraperConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${CHROME_PATH})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScrapeError::ConfigError {
            message: format!("invalid env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 沒有設定商品時使用內建清單
    pub fn items_or_default(&self) -> Vec<ItemConfig> {
        if self.items.is_empty() {
            default_items()
        } else {
            self.items.clone()
        }
    }

    pub fn requests(&self) -> Vec<ScrapeRequest> {
        self.items_or_default()
            .into_iter()
            .flat_map(|item| {
                item.urls
                    .into_iter()
                    .map(move |url| ScrapeRequest::new(item.name.clone(), ensure_full_url(&url)))
            })
            .collect()
    }
}

impl Validate for ScraperConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number(
            "browser.navigation_timeout_secs",
            self.browser.navigation_timeout_secs,
            1,
        )?;
        validation::validate_positive_number(
            "browser.selector_timeout_secs",
            self.browser.selector_timeout_secs,
            1,
        )?;
        if let Some(executable) = &self.browser.executable {
            validation::validate_path("browser.executable", executable)?;
        }

        for platform in PlatformKind::SUPPORTED {
            if let Some(set) = self.selectors.for_platform(platform) {
                validation::validate_non_empty_string(
                    &format!("selectors.{}.price", platform.key()),
                    &set.price,
                )?;
                if let Some(offer) = &set.offer {
                    validation::validate_non_empty_string(
                        &format!("selectors.{}.offer", platform.key()),
                        offer,
                    )?;
                }
            }
        }

        validation::validate_path("output.csv_path", &self.output.csv_path)?;
        validation::validate_non_empty_string("server.host", &self.server.host)?;

        for (index, item) in self.items.iter().enumerate() {
            validation::validate_non_empty_string(&format!("items[{}].name", index), &item.name)?;
            if item.urls.is_empty() {
                return Err(ScrapeError::ConfigValidationError {
                    field: format!("items[{}].urls", index),
                    message: format!("item '{}' has no URLs", item.name),
                });
            }
            for url in &item.urls {
                validation::validate_url(&format!("items[{}].urls", index), &ensure_full_url(url))?;
            }
        }

        Ok(())
    }
}

pub fn default_items() -> Vec<ItemConfig> {
    vec![ItemConfig {
        name: "Samsung Galaxy S23".to_string(),
        urls: vec![
            "https://www.amazon.in/Samsung-Galaxy-Cream-256GB-Storage/dp/B0BTYVTMT6".to_string(),
            "https://www.flipkart.com/samsung-galaxy-s23-5g-cream-128-gb/p/itmc77ff94cdf044?pid=MOBGMFFX5XYE8MZN".to_string(),
            "https://www.croma.com/samsung-galaxy-s23-5g-8gb-ram-128gb-cream-/p/268869".to_string(),
            "https://www.reliancedigital.in/samsung-galaxy-s23-5g-128-gb-8-gb-ram-lavender-mobile-phone/p/493665066".to_string(),
        ],
    }]
}
