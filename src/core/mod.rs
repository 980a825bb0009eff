pub mod batch;
pub mod extractor;
pub mod job;
pub mod resolver;

pub use crate::domain::model::{PlatformKind, ScrapeRequest, ScrapeResult};
pub use crate::domain::ports::{BrowserLauncher, BrowserPage, BrowserSession, Storage};
pub use crate::utils::error::Result;
