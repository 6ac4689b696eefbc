use crate::error::{ProbeError, Result};
use crate::fetch::{self, PAGE_TIMEOUT_SECS};
use crate::report::{
    AuditFinding, CategoryAudit, CategoryAudits, CoreWebVitals, PageSpeedReport, VitalMetric,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

const CATEGORIES: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];

/// Audits scoring below this threshold are surfaced as opportunities or
/// diagnostics.
const AUDIT_THRESHOLD: f64 = 0.9;
const MAX_AUDITS: usize = 10;

/// Client for the external speed-scoring service.
pub struct PageSpeedClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl PageSpeedClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: fetch::build_client(PAGE_TIMEOUT_SECS),
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn run_analysis(&self, target: &Url) -> Result<PageSpeedReport> {
        info!("Requesting speed analysis for {}", target);

        let mut request = self.client.get(&self.endpoint).query(&[
            ("url", target.as_str()),
            ("key", self.api_key.as_str()),
            ("strategy", "desktop"),
        ]);
        for category in CATEGORIES {
            request = request.query(&[("category", category)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::ServiceStatus {
                service: "PageSpeed",
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response.json().await?;
        debug!("Speed analysis response parsed for {}", target);
        Ok(parse_report(envelope))
    }
}

// Wire format, reduced to the fields the probe consumes.

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<Lighthouse>,
}

#[derive(Deserialize, Default)]
struct Lighthouse {
    #[serde(default)]
    categories: HashMap<String, RawCategory>,
    #[serde(default)]
    audits: HashMap<String, RawAudit>,
}

#[derive(Deserialize)]
struct RawCategory {
    score: Option<f64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct RawAudit {
    score: Option<f64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "numericValue")]
    numeric_value: Option<f64>,
    #[serde(rename = "displayValue")]
    display_value: Option<String>,
    details: Option<RawDetails>,
}

#[derive(Deserialize)]
struct RawDetails {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "overallSavingsMs")]
    overall_savings_ms: Option<f64>,
}

fn parse_report(envelope: Envelope) -> PageSpeedReport {
    let lighthouse = envelope.lighthouse_result.unwrap_or_default();

    let category = |key: &str| {
        lighthouse.categories.get(key).map(|raw| CategoryAudit {
            score: raw.score.unwrap_or(0.0),
            title: raw.title.clone(),
            description: raw.description.clone(),
        })
    };

    let categories = CategoryAudits {
        performance: category("performance"),
        accessibility: category("accessibility"),
        best_practices: category("best-practices"),
        seo: category("seo"),
    };

    let vital = |key: &str| {
        lighthouse.audits.get(key).map(|audit| VitalMetric {
            value: audit.numeric_value.unwrap_or(0.0),
            score: audit.score.unwrap_or(0.0),
            display_value: audit.display_value.clone().unwrap_or_default(),
        })
    };

    let core_web_vitals = CoreWebVitals {
        fcp: vital("first-contentful-paint"),
        lcp: vital("largest-contentful-paint"),
        cls: vital("cumulative-layout-shift"),
        inp: vital("interaction-to-next-paint")
            .or_else(|| vital("experimental-interaction-to-next-paint")),
    };

    let mut opportunities = Vec::new();
    let mut diagnostics = Vec::new();

    for (id, audit) in &lighthouse.audits {
        let Some(score) = audit.score else { continue };
        if score >= AUDIT_THRESHOLD {
            continue;
        }

        let savings_ms = audit
            .details
            .as_ref()
            .filter(|d| d.kind.as_deref() == Some("opportunity"))
            .map(|d| d.overall_savings_ms.unwrap_or(0.0));

        let finding = AuditFinding {
            id: id.clone(),
            title: audit.title.clone(),
            description: audit.description.clone(),
            score,
            savings_ms,
        };

        if savings_ms.is_some() {
            opportunities.push(finding);
        } else {
            diagnostics.push(finding);
        }
    }

    // Worst score first; the audit id keeps ordering deterministic.
    let rank = |list: &mut Vec<AuditFinding>| {
        list.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        list.truncate(MAX_AUDITS);
    };
    rank(&mut opportunities);
    rank(&mut diagnostics);

    PageSpeedReport {
        categories,
        core_web_vitals,
        opportunities,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture() -> serde_json::Value {
        json!({
            "lighthouseResult": {
                "categories": {
                    "performance": {"score": 0.82, "title": "Performance", "description": ""},
                    "accessibility": {"score": 0.95, "title": "Accessibility", "description": ""},
                    "best-practices": {"score": 0.74, "title": "Best Practices", "description": ""},
                    "seo": {"score": 0.91, "title": "SEO", "description": ""}
                },
                "audits": {
                    "first-contentful-paint": {
                        "score": 0.88, "numericValue": 1800.0, "displayValue": "1.8 s"
                    },
                    "largest-contentful-paint": {
                        "score": 0.61, "numericValue": 3200.0, "displayValue": "3.2 s"
                    },
                    "cumulative-layout-shift": {
                        "score": 0.99, "numericValue": 0.02, "displayValue": "0.02"
                    },
                    "experimental-interaction-to-next-paint": {
                        "score": 0.8, "numericValue": 250.0, "displayValue": "250 ms"
                    },
                    "render-blocking-resources": {
                        "score": 0.4, "title": "Eliminate render-blocking resources",
                        "description": "",
                        "details": {"type": "opportunity", "overallSavingsMs": 750.0}
                    },
                    "uses-long-cache-ttl": {
                        "score": 0.5, "title": "Serve static assets with an efficient cache policy",
                        "description": "", "details": {"type": "table"}
                    },
                    "is-on-https": {"score": 1.0, "title": "Uses HTTPS", "description": ""}
                }
            }
        })
    }

    #[tokio::test]
    async fn parses_categories_and_vitals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/run"))
            .and(query_param("strategy", "desktop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture()))
            .mount(&server)
            .await;

        let client = PageSpeedClient::new("test-key")
            .with_endpoint(format!("{}/run", server.uri()));
        let target = Url::parse("https://example.com").unwrap();

        let report = client.run_analysis(&target).await.unwrap();

        assert_eq!(report.categories.performance.as_ref().unwrap().score, 0.82);
        assert_eq!(report.categories.best_practices.as_ref().unwrap().score, 0.74);
        let lcp = report.core_web_vitals.lcp.as_ref().unwrap();
        assert_eq!(lcp.value, 3200.0);
        assert_eq!(lcp.display_value, "3.2 s");
        // Primary INP audit key missing, the experimental variant fills in.
        assert_eq!(report.core_web_vitals.inp.as_ref().unwrap().value, 250.0);
    }

    #[tokio::test]
    async fn splits_opportunities_from_diagnostics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/run"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture()))
            .mount(&server)
            .await;

        let client = PageSpeedClient::new("test-key")
            .with_endpoint(format!("{}/run", server.uri()));
        let target = Url::parse("https://example.com").unwrap();

        let report = client.run_analysis(&target).await.unwrap();

        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.opportunities[0].id, "render-blocking-resources");
        assert_eq!(report.opportunities[0].savings_ms, Some(750.0));

        // Everything else below 0.9 lands in diagnostics, worst first;
        // the passing https audit is excluded entirely.
        let ids: Vec<&str> = report.diagnostics.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "uses-long-cache-ttl",
                "largest-contentful-paint",
                "experimental-interaction-to-next-paint",
                "first-contentful-paint",
            ]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/run"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = PageSpeedClient::new("bad-key")
            .with_endpoint(format!("{}/run", server.uri()));
        let target = Url::parse("https://example.com").unwrap();

        let err = client.run_analysis(&target).await.unwrap_err();
        match err {
            ProbeError::ServiceStatus { status, body, .. } => {
                assert_eq!(status, 403);
                assert!(body.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
