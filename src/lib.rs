pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::chromium::ChromiumLauncher;
pub use adapters::csv_sink::CsvSink;
pub use adapters::storage::LocalStorage;
pub use config::ScraperConfig;
pub use core::{batch::BatchScraper, extractor::Extractor, job::ScrapeJob};
pub use domain::model::{BatchReport, PlatformKind, ScrapeRequest, ScrapeResult};
pub use utils::error::{ExtractError, Result, ScrapeError};
