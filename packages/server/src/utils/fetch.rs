use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, Url};
use thiserror::Error;

/// Hard ceiling on page fetches and image downloads. Vision and database
/// calls are deliberately unbounded.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const PAGE_USER_AGENT: &str = "Mozilla/5.0 (compatible; LenscoreBot/1.0)";
const IMAGE_USER_AGENT: &str = "curl/8.0";

/// Transport failures, split so callers can tell a remote HTTP error from a
/// connection problem.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote server returned HTTP {status}")]
    Status { status: u16 },
    #[error("network error: {0}")]
    Network(String),
}

/// Build the shared outbound HTTP client.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(FETCH_TIMEOUT).build()
}

fn page_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(PAGE_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}

fn image_headers(url: &Url) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(IMAGE_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("image/*,*/*"));
    if let Some(referer) = referer_for(url) {
        headers.insert(REFERER, HeaderValue::from_static(referer));
    }
    headers
}

/// Wikimedia properties reject refererless hotlinking.
fn referer_for(url: &Url) -> Option<&'static str> {
    let host = url.host_str()?;
    if host.contains("wikimedia.org") || host.contains("wikipedia.org") {
        Some("https://en.wikipedia.org/")
    } else {
        None
    }
}

/// Fetch a page body as text.
pub async fn fetch_page(client: &Client, url: Url) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .headers(page_headers())
        .send()
        .await
        .map_err(network_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(network_error)
}

/// Download an image, returning its bytes and declared content type: the
/// `Content-Type` header value before any parameters, `image/jpeg` when the
/// header is missing.
pub async fn download_image(client: &Client, url: Url) -> Result<(Bytes, String), FetchError> {
    let headers = image_headers(&url);
    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(network_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
        .unwrap_or_else(|| "image/jpeg".to_string());

    let data = response.bytes().await.map_err(network_error)?;
    Ok((data, content_type))
}

fn network_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.to_string())
}
