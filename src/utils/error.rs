use std::time::Duration;
use thiserror::Error;

/// 應用層級錯誤：瀏覽器啟動、設定、輸出與伺服器。
/// 單一網址的抓取失敗不會走到這裡，見 [`ExtractError`]。
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Browser launch failed: {message}")]
    BrowserLaunchError { message: String },

    #[error("Browser shutdown failed: {message}")]
    BrowserCloseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Browser,
    Output,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScrapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::BrowserLaunchError { .. } | ScrapeError::BrowserCloseError { .. } => {
                ErrorCategory::Browser
            }
            ScrapeError::ConfigError { .. }
            | ScrapeError::ConfigValidationError { .. }
            | ScrapeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScrapeError::CsvError(_)
            | ScrapeError::IoError(_)
            | ScrapeError::SerializationError(_) => ErrorCategory::Output,
            ScrapeError::ServerError { .. } => ErrorCategory::Server,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 瀏覽器已經跑完所有任務，只是關閉時出錯
            ScrapeError::BrowserCloseError { .. } => ErrorSeverity::Low,
            ScrapeError::BrowserLaunchError { .. } => ErrorSeverity::Medium,
            ScrapeError::ConfigError { .. }
            | ScrapeError::ConfigValidationError { .. }
            | ScrapeError::InvalidConfigValueError { .. }
            | ScrapeError::CsvError(_)
            | ScrapeError::SerializationError(_) => ErrorSeverity::High,
            ScrapeError::IoError(_) | ScrapeError::ServerError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Browser => {
                "Check that Chrome/Chromium is installed, or point [browser].executable at it"
            }
            ErrorCategory::Configuration => {
                "Fix the configuration file or command line flags and try again"
            }
            ErrorCategory::Output => "Check that the output path is writable and has free space",
            ErrorCategory::Server => "Check that the host/port is free and reachable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Browser => format!("Browser problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Output => format!("Could not write results: {}", self),
            ErrorCategory::Server => format!("HTTP server problem: {}", self),
        }
    }

    /// CLI 退出碼，Low 視為成功
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl From<toml::de::Error> for ScrapeError {
    fn from(e: toml::de::Error) -> Self {
        ScrapeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// 單一網址抓取失敗的原因，永遠在任務邊界被轉成結果上的字串。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("timed out after {}s waiting for selector \"{selector}\"", .timeout.as_secs_f64())]
    SelectorTimeout { selector: String, timeout: Duration },

    #[error("page error: {message}")]
    Page { message: String },

    #[error("Platform not supported")]
    UnsupportedPlatform,
}

impl ExtractError {
    pub fn page(message: impl std::fmt::Display) -> Self {
        ExtractError::Page {
            message: message.to_string(),
        }
    }
}
