// Adapters layer: concrete implementations for the browser, HTTP surface and output storage.

pub mod chromium;
pub mod csv_sink;
pub mod http;
pub mod storage;
