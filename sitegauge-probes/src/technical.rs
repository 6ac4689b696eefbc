use crate::error::Result;
use crate::fetch::fetch_page;
use crate::report::{
    RobotsReport, SecurityHeaderChecks, ServerInfo, SitemapReport, TechnicalReport,
};
use regex::Regex;
use reqwest::Client;
use tracing::debug;
use url::Url;

const ROBOTS_SAMPLE_LEN: usize = 500;

/// `client` fetches the page under analysis; `aux_client` carries the
/// shorter timeout used for robots.txt and sitemap.xml.
pub async fn run(client: &Client, aux_client: &Client, target: &Url) -> Result<TechnicalReport> {
    let page = fetch_page(client, target).await?;

    let (robots_text, sitemap_text) = futures::join!(
        fetch_optional_text(aux_client, target, "/robots.txt"),
        fetch_optional_text(aux_client, target, "/sitemap.xml"),
    );
    let references_sitemap = robots_text.to_lowercase().contains("sitemap");

    let sitemap_url = target
        .join("/sitemap.xml")
        .map(|u| u.to_string())
        .unwrap_or_default();
    let sitemap = parse_sitemap(&sitemap_text, sitemap_url, references_sitemap);

    Ok(TechnicalReport {
        https: target.scheme() == "https",
        security_headers: SecurityHeaderChecks {
            content_security_policy: page.security_headers.content_security_policy,
            x_frame_options: page.security_headers.x_frame_options,
            x_content_type_options: page.security_headers.x_content_type_options,
            strict_transport_security: page.security_headers.strict_transport_security,
        },
        response_time_ms: page.response_time.as_millis() as u64,
        status_code: page.status_code,
        content_type: page.content_type,
        content_length: page.body.len(),
        server: ServerInfo {
            server: page.server,
            powered_by: page.powered_by,
        },
        robots: RobotsReport {
            exists: !robots_text.is_empty(),
            references_sitemap,
            sample: robots_text.chars().take(ROBOTS_SAMPLE_LEN).collect(),
        },
        sitemap,
    })
}

/// A missing or unreachable robots.txt/sitemap.xml is an absence, not a
/// probe failure.
async fn fetch_optional_text(client: &Client, target: &Url, path: &str) -> String {
    let Ok(url) = target.join(path) else {
        return String::new();
    };
    match client.get(url.clone()).send().await {
        Ok(response) if response.status().is_success() => {
            response.text().await.unwrap_or_default()
        }
        Ok(response) => {
            debug!("{} returned status {}", url, response.status());
            String::new()
        }
        Err(e) => {
            debug!("{} not fetched: {}", url, e);
            String::new()
        }
    }
}

fn parse_sitemap(xml: &str, url: String, referenced_by_robots: bool) -> SitemapReport {
    if xml.is_empty() {
        return SitemapReport {
            exists: false,
            url,
            url_count: 0,
            last_modified: None,
            referenced_by_robots,
        };
    }

    let url_count = xml.matches("<url>").count();

    let lastmod_re = Regex::new(r"<lastmod>([^<]+)</lastmod>").unwrap();
    let last_modified = lastmod_re
        .captures_iter(xml)
        .map(|c| c[1].trim().to_string())
        .max();

    SitemapReport {
        exists: true,
        url,
        url_count,
        last_modified,
        referenced_by_robots,
    }
}
