use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 終端機用 compact，伺服器部署交給日誌收集器時用 JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// RUST_LOG 未設定時的預設過濾規則。
/// 平常只留本 crate 的 info，其他 crate 只看 warn；verbose 時本 crate 與 tower_http 開到 debug。
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "price_scrape=debug,tower_http=debug,info"
    } else {
        "price_scrape=info,chromiumoxide=warn,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// 只能呼叫一次；verbose 時附上 target 方便追 CDP 與 HTTP 的訊息來源
pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(env_filter(verbose));
    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json().flatten_event(true)).init(),
    }
}
