// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create an asynchronous HTTP client that sends browser-like headers.
///
/// gzip, brotli and deflate bodies are decoded transparently by reqwest.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("accept", &config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept_language", &config.accept_language)?,
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("crawler.{field} is not a valid header: {e}")))
}

/// Fetch a page asynchronously and parse it as HTML.
///
/// Any status other than 200 is a network error carrying the status.
pub async fn fetch_page_async(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Html> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AppError::network(url, e.status().map(|s| s.as_u16()), e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(AppError::network(
            url,
            Some(status.as_u16()),
            format!("status code error: {status}"),
        ));
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_decode() {
            AppError::parse(url, e)
        } else {
            AppError::network(url, None, e)
        }
    })?;

    let text = String::from_utf8_lossy(&bytes);
    if text.trim().is_empty() {
        return Err(AppError::parse(url, "empty response body"));
    }

    log::debug!("Fetched {} ({} bytes)", url, bytes.len());
    Ok(Html::parse_document(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_defaults() {
        assert!(create_async_client(&CrawlerConfig::default()).is_ok());
    }

    #[test]
    fn test_client_rejects_bad_header() {
        let config = CrawlerConfig {
            accept: "text/html\n".to_string(),
            ..CrawlerConfig::default()
        };
        assert!(matches!(
            create_async_client(&config),
            Err(AppError::Config(_))
        ));
    }
}
