use crate::utils::error::ExtractError;
use crate::utils::monitor::BatchUsage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PRICE_PLACEHOLDER: &str = "Price not available";
pub const OFFER_PLACEHOLDER: &str = "Offer not available";
pub const UNSUPPORTED_PLATFORM: &str = "Platform not supported";

/// 一筆待抓取的商品網址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub item_name: String,
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(item_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Amazon,
    Flipkart,
    Croma,
    RelianceDigital,
    Unknown,
}

impl PlatformKind {
    /// 解析順序即優先順序
    pub const SUPPORTED: [PlatformKind; 4] = [
        PlatformKind::Amazon,
        PlatformKind::Flipkart,
        PlatformKind::Croma,
        PlatformKind::RelianceDigital,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformKind::Amazon => "Amazon",
            PlatformKind::Flipkart => "Flipkart",
            PlatformKind::Croma => "Croma",
            PlatformKind::RelianceDigital => "Reliance Digital",
            PlatformKind::Unknown => "Unknown",
        }
    }

    /// 設定檔與 CSV 使用的鍵
    pub fn key(&self) -> &'static str {
        match self {
            PlatformKind::Amazon => "amazon",
            PlatformKind::Flipkart => "flipkart",
            PlatformKind::Croma => "croma",
            PlatformKind::RelianceDigital => "reliance_digital",
            PlatformKind::Unknown => "unknown",
        }
    }

    pub fn host_fragment(&self) -> Option<&'static str> {
        match self {
            PlatformKind::Amazon => Some("amazon"),
            PlatformKind::Flipkart => Some("flipkart"),
            PlatformKind::Croma => Some("croma"),
            PlatformKind::RelianceDigital => Some("reliancedigital"),
            PlatformKind::Unknown => None,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 頁面上讀到的文字；None 代表等待成功後仍找不到元素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetails {
    pub price: Option<String>,
    pub offer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    Failed,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    #[serde(rename = "device_name")]
    pub item_name: String,
    pub platform: PlatformKind,
    pub url: String,
    pub price: String,
    pub offer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn from_outcome(
        request: &ScrapeRequest,
        platform: PlatformKind,
        outcome: std::result::Result<ProductDetails, ExtractError>,
    ) -> Self {
        let mut result = Self {
            item_name: request.item_name.clone(),
            platform,
            url: request.url.clone(),
            price: PRICE_PLACEHOLDER.to_string(),
            offer: OFFER_PLACEHOLDER.to_string(),
            error: None,
        };

        match outcome {
            Ok(details) => {
                if let Some(price) = details.price {
                    result.price = price;
                }
                if let Some(offer) = details.offer {
                    result.offer = offer;
                }
            }
            Err(ExtractError::UnsupportedPlatform) => {
                result.price = UNSUPPORTED_PLATFORM.to_string();
            }
            Err(e) => {
                result.error = Some(format!("Error scraping {}: {}", platform, e));
            }
        }

        result
    }

    pub fn status(&self) -> ResultStatus {
        if self.error.is_some() {
            ResultStatus::Failed
        } else if self.platform == PlatformKind::Unknown {
            ResultStatus::Unsupported
        } else {
            ResultStatus::Success
        }
    }
}

/// 批次生命週期：Idle → BrowserLaunched → TasksDispatched → AllSettled → BrowserClosed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchPhase {
    Idle,
    BrowserLaunched,
    TasksDispatched,
    AllSettled,
    BrowserClosed,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchPhase::Idle => "idle",
            BatchPhase::BrowserLaunched => "browser launched",
            BatchPhase::TasksDispatched => "tasks dispatched",
            BatchPhase::AllSettled => "all settled",
            BatchPhase::BrowserClosed => "browser closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub unsupported: usize,
    pub final_phase: BatchPhase,
}

impl BatchSummary {
    pub fn from_results(
        results: &[ScrapeResult],
        started_at: DateTime<Utc>,
        final_phase: BatchPhase,
    ) -> Self {
        let count = |status: ResultStatus| results.iter().filter(|r| r.status() == status).count();

        Self {
            started_at,
            finished_at: Utc::now(),
            total: results.len(),
            succeeded: count(ResultStatus::Success),
            failed: count(ResultStatus::Failed),
            unsupported: count(ResultStatus::Unsupported),
            final_phase,
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// 一次批次的完整輸出
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub results: Vec<ScrapeResult>,
    pub summary: BatchSummary,
    /// 只有開啟 --monitor 時才有
    pub usage: Option<BatchUsage>,
}
