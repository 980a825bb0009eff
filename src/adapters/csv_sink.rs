use crate::domain::model::ScrapeResult;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, ScrapeError};
use serde::Serialize;

pub const CSV_HEADER: [&str; 6] = ["device_name", "platform", "url", "price", "offer", "error"];

/// 每一列欄位固定，失敗的列 error 有值、成功的列留空
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    device_name: &'a str,
    platform: &'a str,
    url: &'a str,
    price: &'a str,
    offer: &'a str,
    error: &'a str,
}

impl<'a> From<&'a ScrapeResult> for CsvRow<'a> {
    fn from(result: &'a ScrapeResult) -> Self {
        Self {
            device_name: &result.item_name,
            platform: result.platform.key(),
            url: &result.url,
            price: &result.price,
            offer: &result.offer,
            error: result.error.as_deref().unwrap_or(""),
        }
    }
}

pub fn render_csv(results: &[ScrapeResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // serialize 只在第一列時寫標題，空結果要自己補
    if results.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    for result in results {
        writer.serialize(CsvRow::from(result))?;
    }

    writer
        .into_inner()
        .map_err(|e| ScrapeError::IoError(e.into_error()))
}

pub struct CsvSink<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> CsvSink<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub async fn write(&self, results: &[ScrapeResult]) -> Result<String> {
        let data = render_csv(results)?;
        tracing::debug!("Writing {} CSV bytes to {}", data.len(), self.path);
        self.storage.write_file(&self.path, &data).await
    }
}
