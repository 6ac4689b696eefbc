use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitegauge_probes::report::{
    ContentReport, PageSpeedReport, ProbeResult, SeoReport, TechnicalReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SEO")]
    Seo,
    Performance,
    Accessibility,
    #[serde(rename = "Best Practices")]
    BestPractices,
    Content,
    Technical,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Seo => "SEO",
            Category::Performance => "Performance",
            Category::Accessibility => "Accessibility",
            Category::BestPractices => "Best Practices",
            Category::Content => "Content",
            Category::Technical => "Technical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub impact: Impact,
}

impl Recommendation {
    /// Case-insensitive trimmed title, used to deduplicate a run's set.
    pub fn dedup_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// Normalized 0-100 scores, recomputed every run from the performance
/// probe's category fractions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryScores {
    pub seo: u8,
    pub performance: u8,
    pub accessibility: u8,
    pub best_practices: u8,
}

impl CategoryScores {
    /// Integer average of the four scores, floor division.
    pub fn overall(&self) -> u8 {
        ((self.seo as u16
            + self.performance as u16
            + self.accessibility as u16
            + self.best_practices as u16)
            / 4) as u8
    }

    /// The score backing a recommendation category. Content and Technical
    /// carry no numeric score of their own.
    pub fn get(&self, category: Category) -> Option<u8> {
        match category {
            Category::Seo => Some(self.seo),
            Category::Performance => Some(self.performance),
            Category::Accessibility => Some(self.accessibility),
            Category::BestPractices => Some(self.best_practices),
            Category::Content | Category::Technical => None,
        }
    }
}

/// The four probe outcomes of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeFindings {
    pub seo: ProbeResult<SeoReport>,
    pub performance: ProbeResult<PageSpeedReport>,
    pub content: ProbeResult<ContentReport>,
    pub technical: ProbeResult<TechnicalReport>,
}

/// Aggregate result of one analysis run. Owned by the orchestrator until
/// completion, then handed to the store by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub url: String,
    pub analyzed_at: DateTime<Utc>,
    pub scores: CategoryScores,
    pub findings: ProbeFindings,
    pub recommendations: Vec<Recommendation>,
}
