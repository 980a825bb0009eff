// Domain layer: records, platform enum and the ports the scraper drives.
// Adapters for Chromium, HTTP and storage live under src/adapters.

pub mod model;
pub mod ports;
