mod common;

use anyhow::Result;
use common::*;
use price_scrape::adapters::http;
use price_scrape::BatchScraper;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// 在隨機埠啟動 API，回傳 base URL
async fn spawn_api(launcher: ScriptedLauncher) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = http::router(Arc::new(BatchScraper::new(launcher, test_extractor())));

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_empty_url_list_is_rejected() -> Result<()> {
    let launcher = ScriptedLauncher::new(vec![]);
    let stats = launcher.stats.clone();
    let base = spawn_api(launcher).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({ "urls": [] }))
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "No URLs provided" }));
    assert_eq!(stats.launches(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_urls_field_is_rejected() -> Result<()> {
    let base = spawn_api(ScriptedLauncher::new(vec![])).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({ "links": ["https://www.croma.com/p/1"] }))
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "No URLs provided");
    Ok(())
}

#[tokio::test]
async fn test_null_urls_is_treated_as_missing() -> Result<()> {
    let launcher = ScriptedLauncher::new(vec![]);
    let stats = launcher.stats.clone();
    let base = spawn_api(launcher).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({ "urls": null }))
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "error": "No URLs provided" }));
    assert_eq!(stats.launches(), 0);
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_rejected() -> Result<()> {
    let base = spawn_api(ScriptedLauncher::new(vec![])).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .header("Content-Type", "application/json")
        .body("{\"urls\": [")
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Invalid JSON body"));
    Ok(())
}

#[tokio::test]
async fn test_url_without_scheme_is_normalised_and_timeout_reported() -> Result<()> {
    // 頁面上沒有價格元素，選擇器等待逾時
    let launcher = ScriptedLauncher::new(vec![("https://flipkart.com/p/abc", PageScript::new())]);
    let stats = launcher.stats.clone();
    let base = spawn_api(launcher).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({ "urls": ["flipkart.com/p/abc"] }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: Vec<Value> = response.json().await?;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["url"], "https://flipkart.com/p/abc");
    assert_eq!(body[0]["platform"], "flipkart");
    assert!(body[0]["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Error scraping Flipkart: "));

    assert_eq!(stats.navigations(), vec!["https://flipkart.com/p/abc".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_results_follow_submission_order() -> Result<()> {
    let launcher = ScriptedLauncher::new(vec![
        (
            "https://www.croma.com/p/268869",
            PageScript::new()
                .delay(std::time::Duration::from_millis(80))
                .element(CROMA_PRICE, "₹71,490"),
        ),
        (
            "https://www.amazon.in/dp/B0BTYVTMT6",
            PageScript::new().element(AMAZON_PRICE, "₹74,999"),
        ),
    ]);
    let base = spawn_api(launcher).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({
            "urls": [
                "https://www.croma.com/p/268869",
                "www.amazon.in/dp/B0BTYVTMT6",
                "https://example.com/item"
            ]
        }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: Vec<Value> = response.json().await?;
    assert_eq!(body.len(), 3);

    assert_eq!(body[0]["platform"], "croma");
    assert_eq!(body[0]["price"], "₹71,490");
    assert_eq!(body[1]["platform"], "amazon");
    assert_eq!(body[1]["url"], "https://www.amazon.in/dp/B0BTYVTMT6");
    assert_eq!(body[1]["price"], "₹74,999");
    assert_eq!(body[2]["platform"], "unknown");
    assert_eq!(body[2]["price"], "Platform not supported");
    assert!(body.iter().all(|r| r.get("error").is_none()));
    Ok(())
}

#[tokio::test]
async fn test_browser_launch_failure_is_server_error() -> Result<()> {
    let base = spawn_api(ScriptedLauncher::failing()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/scrape", base))
        .json(&json!({ "urls": ["https://www.croma.com/p/1"] }))
        .send()
        .await?;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Browser launch failed"));
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let base = spawn_api(ScriptedLauncher::new(vec![])).await?;

    let response = reqwest::get(format!("{}/health", base)).await?;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "ok");
    Ok(())
}
