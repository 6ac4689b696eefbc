use crate::error::Result;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const USER_AGENT: &str = "Sitegauge/0.1 (https://github.com/sitegauge/sitegauge)";

/// Timeout for fetching the page under analysis.
pub const PAGE_TIMEOUT_SECS: u64 = 30;
/// Timeout for auxiliary fetches (robots.txt, sitemap.xml).
pub const AUX_TIMEOUT_SECS: u64 = 10;

pub fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs / 2))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .expect("Failed to create HTTP client")
}

/// A fetched page with the response metadata the probes care about.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub server: Option<String>,
    pub powered_by: Option<String>,
    pub security_headers: FetchedSecurityHeaders,
    pub body: String,
    pub response_time: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct FetchedSecurityHeaders {
    pub content_security_policy: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
    pub strict_transport_security: bool,
}

pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    debug!("Fetching {}", url);

    let start = Instant::now();
    let response = client.get(url.clone()).send().await?;
    let response_time = start.elapsed();

    let status_code = response.status().as_u16();
    let headers = response.headers().clone();
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    let security_headers = FetchedSecurityHeaders {
        content_security_policy: headers.contains_key("content-security-policy"),
        x_frame_options: headers.contains_key("x-frame-options"),
        x_content_type_options: headers.contains_key("x-content-type-options"),
        strict_transport_security: headers.contains_key("strict-transport-security"),
    };

    let content_type = header_str("content-type");
    let server = header_str("server");
    let powered_by = header_str("x-powered-by");

    let body = response.text().await?;

    Ok(FetchedPage {
        status_code,
        content_type,
        server,
        powered_by,
        security_headers,
        body,
        response_time,
    })
}
