use crate::adapters::csv_sink::CsvSink;
use crate::core::batch::BatchScraper;
use crate::domain::model::{BatchReport, ScrapeRequest};
use crate::domain::ports::{BrowserLauncher, Storage};
use crate::utils::error::Result;

/// 命令列批次：抓取後寫成 CSV
pub struct ScrapeJob<L: BrowserLauncher, S: Storage> {
    scraper: BatchScraper<L>,
    sink: CsvSink<S>,
}

#[derive(Debug)]
pub struct JobOutput {
    pub report: BatchReport,
    pub output_path: String,
}

impl<L: BrowserLauncher, S: Storage> ScrapeJob<L, S> {
    pub fn new(scraper: BatchScraper<L>, sink: CsvSink<S>) -> Self {
        Self { scraper, sink }
    }

    pub async fn run(&self, requests: Vec<ScrapeRequest>) -> Result<JobOutput> {
        tracing::info!("Scraping {} product page(s)...", requests.len());
        let report = self.scraper.run(requests).await?;

        tracing::info!("Writing {} result(s) to CSV...", report.results.len());
        let output_path = self.sink.write(&report.results).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(JobOutput {
            report,
            output_path,
        })
    }
}
