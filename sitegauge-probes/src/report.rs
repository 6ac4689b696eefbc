use crate::error::ProbeError;
use serde::{Deserialize, Serialize};

/// Outcome of a single probe run. A probe either delivers its findings or
/// records why it could not; it never aborts the run it is part of.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeResult<T> {
    Ok { findings: T },
    Failed { reason: String },
}

impl<T> ProbeResult<T> {
    pub fn from_run(run: Result<T, ProbeError>) -> Self {
        match run {
            Ok(findings) => ProbeResult::Ok { findings },
            Err(e) => ProbeResult::Failed {
                reason: e.to_string(),
            },
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        ProbeResult::Failed {
            reason: reason.into(),
        }
    }

    pub fn findings(&self) -> Option<&T> {
        match self {
            ProbeResult::Ok { findings } => Some(findings),
            ProbeResult::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ProbeResult::Ok { .. } => None,
            ProbeResult::Failed { reason } => Some(reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProbeResult::Failed { .. })
    }
}

// ---------------------------------------------------------------------------
// SEO probe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeoReport {
    pub title: TitleCheck,
    pub meta_description: DescriptionCheck,
    pub headings: HeadingOutline,
    pub images: ImageAltStats,
    pub links: LinkCounts,
    pub structured_data: bool,
    pub meta_tags: MetaTagChecks,
    pub url_shape: UrlShape,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleCheck {
    pub text: String,
    pub length: usize,
    /// Title length within the 50-60 character window.
    pub optimal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptionCheck {
    pub text: String,
    pub length: usize,
    /// Description length within the 150-160 character window.
    pub optimal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HeadingOutline {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageAltStats {
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
    /// with_alt / total, 0 when the page has no images.
    pub alt_coverage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetaTagChecks {
    pub viewport: bool,
    pub robots: bool,
    pub canonical: bool,
    pub og_title: bool,
    pub og_description: bool,
    pub twitter_card: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UrlShape {
    pub https: bool,
    pub www: bool,
    pub length: usize,
}

// ---------------------------------------------------------------------------
// Performance probe (PageSpeed)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSpeedReport {
    pub categories: CategoryAudits,
    pub core_web_vitals: CoreWebVitals,
    pub opportunities: Vec<AuditFinding>,
    pub diagnostics: Vec<AuditFinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CategoryAudits {
    pub performance: Option<CategoryAudit>,
    pub accessibility: Option<CategoryAudit>,
    pub best_practices: Option<CategoryAudit>,
    pub seo: Option<CategoryAudit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAudit {
    /// Category score as reported by the service, in [0, 1].
    pub score: f64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CoreWebVitals {
    pub fcp: Option<VitalMetric>,
    pub lcp: Option<VitalMetric>,
    pub cls: Option<VitalMetric>,
    pub inp: Option<VitalMetric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalMetric {
    pub value: f64,
    pub score: f64,
    pub display_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditFinding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_ms: Option<f64>,
}

// ---------------------------------------------------------------------------
// Content probe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentReport {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub avg_paragraph_words: f64,
    pub readability: Readability,
    pub keywords: Vec<KeywordCount>,
    pub structure: ContentStructure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Readability {
    pub flesch_score: f64,
    pub grade_level: f64,
    pub label: ReadabilityLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReadabilityLevel {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly Easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly Difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very Difficult")]
    VeryDifficult,
}

impl ReadabilityLevel {
    pub fn from_flesch(score: f64) -> Self {
        if score >= 90.0 {
            ReadabilityLevel::VeryEasy
        } else if score >= 80.0 {
            ReadabilityLevel::Easy
        } else if score >= 70.0 {
            ReadabilityLevel::FairlyEasy
        } else if score >= 60.0 {
            ReadabilityLevel::Standard
        } else if score >= 50.0 {
            ReadabilityLevel::FairlyDifficult
        } else if score >= 30.0 {
            ReadabilityLevel::Difficult
        } else {
            ReadabilityLevel::VeryDifficult
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadabilityLevel::VeryEasy => "Very Easy",
            ReadabilityLevel::Easy => "Easy",
            ReadabilityLevel::FairlyEasy => "Fairly Easy",
            ReadabilityLevel::Standard => "Standard",
            ReadabilityLevel::FairlyDifficult => "Fairly Difficult",
            ReadabilityLevel::Difficult => "Difficult",
            ReadabilityLevel::VeryDifficult => "Very Difficult",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContentStructure {
    pub has_intro: bool,
    pub has_conclusion: bool,
    pub has_subheadings: bool,
}

// ---------------------------------------------------------------------------
// Technical probe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnicalReport {
    pub https: bool,
    pub security_headers: SecurityHeaderChecks,
    pub response_time_ms: u64,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: usize,
    pub server: ServerInfo,
    pub robots: RobotsReport,
    pub sitemap: SitemapReport,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SecurityHeaderChecks {
    pub content_security_policy: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
    pub strict_transport_security: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServerInfo {
    pub server: Option<String>,
    pub powered_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RobotsReport {
    pub exists: bool,
    pub references_sitemap: bool,
    /// First 500 characters for the report output.
    pub sample: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SitemapReport {
    pub exists: bool,
    pub url: String,
    pub url_count: usize,
    /// Lexicographic max over the <lastmod> strings present, not date-parsed.
    pub last_modified: Option<String>,
    pub referenced_by_robots: bool,
}
