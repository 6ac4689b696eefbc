//! Analysis orchestration: validation, cache freshness, concurrent probe
//! fan-out with an all-complete barrier, scoring, recommendation generation
//! and best-effort persistence.

use crate::llm::{self, CompletionClient};
use crate::model::{AnalysisResult, ProbeFindings};
use crate::recommend::RecommendationEngine;
use crate::score;
use crate::store::ResultStore;
use chrono::{Duration, Utc};
use sitegauge_probes::error::ProbeError;
use sitegauge_probes::fetch::{self, AUX_TIMEOUT_SECS, PAGE_TIMEOUT_SECS};
use sitegauge_probes::performance::{self, PageSpeedClient};
use sitegauge_probes::report::{PageSpeedReport, ProbeResult};
use sitegauge_probes::{content, seo, technical};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Invalid URL: {0}")]
    InvalidInput(String),
}

/// Explicit configuration handed to the analyzer at construction. The
/// AI-vs-fallback branch is decided here, never by probing the environment
/// at call time.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub llm_api_key: Option<String>,
    pub llm_endpoint: String,
    pub llm_model: String,
    /// Cached results older than this are recomputed.
    pub cache_max_age: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pagespeed_api_key: None,
            pagespeed_endpoint: performance::DEFAULT_ENDPOINT.to_string(),
            llm_api_key: None,
            llm_endpoint: llm::DEFAULT_ENDPOINT.to_string(),
            llm_model: llm::DEFAULT_MODEL.to_string(),
            cache_max_age: Duration::hours(24),
        }
    }
}

pub struct WebsiteAnalyzer {
    config: AnalyzerConfig,
    store: Arc<dyn ResultStore>,
    page_client: reqwest::Client,
    aux_client: reqwest::Client,
    engine: RecommendationEngine,
}

impl WebsiteAnalyzer {
    pub fn new(config: AnalyzerConfig, store: Arc<dyn ResultStore>) -> Self {
        let completion_client = config.llm_api_key.as_ref().map(|key| {
            CompletionClient::new(key.as_str())
                .with_endpoint(config.llm_endpoint.as_str())
                .with_model(config.llm_model.as_str())
        });

        Self {
            page_client: fetch::build_client(PAGE_TIMEOUT_SECS),
            aux_client: fetch::build_client(AUX_TIMEOUT_SECS),
            engine: RecommendationEngine::new(completion_client),
            config,
            store,
        }
    }

    /// Run a full analysis for `url`, serving a fresh cached result when one
    /// exists. Only an invalid URL is an error; every other fault is
    /// contained inside the returned result.
    pub async fn analyze(&self, url: &str, requester: &str) -> Result<AnalysisResult, AnalyzeError> {
        let target = validate_url(url)?;
        info!("Starting website analysis for {}", target);

        match self.store.get(target.as_str()) {
            Ok(Some(entry)) if Utc::now() - entry.analyzed_at < self.config.cache_max_age => {
                info!("Returning cached analysis for {}", target);
                return Ok(entry.result);
            }
            Ok(_) => {}
            // A broken store read degrades to a cache miss.
            Err(e) => warn!("Cache lookup failed for {}: {}", target, e),
        }

        // Fan out the four probes and wait for all of them; a failing probe
        // settles as a Failed marker without cancelling its siblings.
        let (seo_run, performance_run, content_run, technical_run) = tokio::join!(
            seo::run(&self.page_client, &target),
            self.run_performance(&target),
            content::run(&self.page_client, &target),
            technical::run(&self.page_client, &self.aux_client, &target),
        );

        let findings = ProbeFindings {
            seo: ProbeResult::from_run(seo_run),
            performance: ProbeResult::from_run(performance_run),
            content: ProbeResult::from_run(content_run),
            technical: ProbeResult::from_run(technical_run),
        };
        for (name, reason) in [
            ("seo", findings.seo.failure_reason()),
            ("performance", findings.performance.failure_reason()),
            ("content", findings.content.failure_reason()),
            ("technical", findings.technical.failure_reason()),
        ] {
            if let Some(reason) = reason {
                warn!("{} probe failed for {}: {}", name, target, reason);
            }
        }

        let scores = score::normalize(&findings.performance);
        let recommendations = self.engine.recommend(&scores, &findings).await;

        let result = AnalysisResult {
            url: target.to_string(),
            analyzed_at: Utc::now(),
            scores,
            findings,
            recommendations,
        };

        // Best effort; the computed result is returned either way.
        if let Err(e) = self.store.put(target.as_str(), &result, requester) {
            warn!("Failed to cache analysis for {}: {}", target, e);
        }

        info!("Website analysis completed for {}", target);
        Ok(result)
    }

    async fn run_performance(&self, target: &Url) -> Result<PageSpeedReport, ProbeError> {
        let Some(api_key) = &self.config.pagespeed_api_key else {
            return Err(ProbeError::MissingCredential(
                "PageSpeed API key not configured",
            ));
        };
        PageSpeedClient::new(api_key.as_str())
            .with_endpoint(self.config.pagespeed_endpoint.as_str())
            .run_analysis(target)
            .await
    }
}

/// Syntactic check only: the URL must carry a scheme and a host. No network
/// access.
pub fn validate_url(url: &str) -> Result<Url, AnalyzeError> {
    let parsed =
        Url::parse(url).map_err(|e| AnalyzeError::InvalidInput(format!("{url}: {e}")))?;
    if !parsed.has_host() {
        return Err(AnalyzeError::InvalidInput(format!("{url}: missing host")));
    }
    Ok(parsed)
}
