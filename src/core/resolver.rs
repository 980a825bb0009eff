use crate::domain::model::PlatformKind;
use url::Url;

/// 依主機名稱的子字串決定平台，先符合者勝出。
/// 解析不了的網址直接對整個字串比對。
pub fn resolve_platform(url: &str) -> PlatformKind {
    let haystack = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().map(str::to_string),
        Err(_) => None,
    };
    let haystack = haystack.as_deref().unwrap_or(url);

    PlatformKind::SUPPORTED
        .into_iter()
        .find(|platform| {
            platform
                .host_fragment()
                .is_some_and(|fragment| haystack.contains(fragment))
        })
        .unwrap_or(PlatformKind::Unknown)
}

/// 沒有 http(s) 前綴的網址補上 `https://`
pub fn ensure_full_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}
