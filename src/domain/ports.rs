use crate::utils::error::{ExtractError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// 每個批次啟動一次瀏覽器
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session>;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: BrowserPage;

    /// 每個任務各自開一個分頁，不共用
    async fn new_page(&self) -> std::result::Result<Self::Page, ExtractError>;

    async fn close(self) -> Result<()>;
}

#[async_trait]
pub trait BrowserPage: Send + Sync {
    async fn goto(&self, url: &str) -> std::result::Result<(), ExtractError>;

    /// 直到元素出現才返回，逾時由呼叫端包 `tokio::time::timeout`
    async fn wait_for_selector(&self, selector: &str) -> std::result::Result<(), ExtractError>;

    /// 第一個符合元素的 inner text；沒有元素時回 None
    async fn inner_text(&self, selector: &str) -> std::result::Result<Option<String>, ExtractError>;

    async fn close(self) -> std::result::Result<(), ExtractError>;
}
