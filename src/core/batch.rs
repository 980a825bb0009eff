use crate::core::extractor::Extractor;
use crate::core::resolver::resolve_platform;
use crate::domain::model::{
    BatchPhase, BatchReport, BatchSummary, PlatformKind, ScrapeRequest, ScrapeResult,
};
use crate::domain::ports::{BrowserLauncher, BrowserPage, BrowserSession};
use crate::utils::error::{ExtractError, Result};
use crate::utils::monitor::BatchMonitor;
use chrono::Utc;
use futures::future::join_all;

/// 一個批次共用一個瀏覽器，每筆網址各開一個分頁並行抓取
pub struct BatchScraper<L: BrowserLauncher> {
    launcher: L,
    extractor: Extractor,
    monitoring: bool,
}

impl<L: BrowserLauncher> BatchScraper<L> {
    pub fn new(launcher: L, extractor: Extractor) -> Self {
        Self {
            launcher,
            extractor,
            monitoring: false,
        }
    }

    /// 每個批次各自取樣 CPU/記憶體
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitoring = enabled;
        self
    }

    /// 只有瀏覽器啟動失敗會回 Err；單筆失敗都記錄在結果的 error 欄位
    pub async fn run(&self, requests: Vec<ScrapeRequest>) -> Result<BatchReport> {
        let started_at = Utc::now();
        let mut phase = BatchPhase::Idle;
        let mut monitor = BatchMonitor::start(self.monitoring);
        tracing::info!("🚀 Starting batch of {} request(s)", requests.len());

        let session = self.launcher.launch().await?;
        advance(&mut phase, BatchPhase::BrowserLaunched, &mut monitor);

        let tasks: Vec<_> = requests
            .iter()
            .map(|request| self.scrape_one(&session, request))
            .collect();
        advance(&mut phase, BatchPhase::TasksDispatched, &mut monitor);

        let results = join_all(tasks).await;
        advance(&mut phase, BatchPhase::AllSettled, &mut monitor);

        match session.close().await {
            Ok(()) => advance(&mut phase, BatchPhase::BrowserClosed, &mut monitor),
            Err(e) => tracing::warn!("⚠️ Browser did not close cleanly: {}", e),
        }

        let summary = BatchSummary::from_results(&results, started_at, phase);
        tracing::info!(
            "✅ Batch finished: {} total, {} succeeded, {} failed, {} unsupported",
            summary.total,
            summary.succeeded,
            summary.failed,
            summary.unsupported
        );
        let usage = monitor.finish();

        Ok(BatchReport {
            results,
            summary,
            usage,
        })
    }

    async fn scrape_one(&self, session: &L::Session, request: &ScrapeRequest) -> ScrapeResult {
        let platform = resolve_platform(&request.url);

        let outcome = match platform {
            PlatformKind::Unknown => Err(ExtractError::UnsupportedPlatform),
            _ => match session.new_page().await {
                Ok(page) => {
                    let outcome = self.extractor.extract(&page, platform, &request.url).await;
                    if let Err(e) = page.close().await {
                        tracing::debug!("Failed to close page for {}: {}", request.url, e);
                    }
                    outcome
                }
                Err(e) => Err(e),
            },
        };

        match &outcome {
            Ok(_) => tracing::info!("🛒 {} [{}] scraped", request.item_name, platform),
            Err(ExtractError::UnsupportedPlatform) => {
                tracing::warn!("Platform not supported for {}", request.url)
            }
            Err(e) => tracing::warn!("❌ {} [{}] failed: {}", request.url, platform, e),
        }

        ScrapeResult::from_outcome(request, platform, outcome)
    }
}

fn advance(phase: &mut BatchPhase, next: BatchPhase, monitor: &mut BatchMonitor) {
    tracing::debug!("Batch phase: {} → {}", phase, next);
    *phase = next;
    monitor.record(next);
}
