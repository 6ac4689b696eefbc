//! Recommendation generation. An AI-assisted path produces plain-language
//! advice scoped to the weakest categories; a deterministic table stands in
//! whenever the AI path is unavailable or misbehaves. The engine never
//! returns an error to the orchestrator.

use crate::llm::{CompletionClient, CompletionError};
use crate::model::{Category, CategoryScores, Impact, ProbeFindings, Recommendation};
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Categories scoring below this are improvement targets.
pub const IMPROVEMENT_THRESHOLD: u8 = 90;

const MAX_RECOMMENDATIONS: usize = 3;
const COMPLETION_MAX_TOKENS: u32 = 1000;
const COMPLETION_TEMPERATURE: f64 = 0.7;

/// LCP above this many milliseconds is considered slow.
const LCP_THRESHOLD_MS: f64 = 2500.0;
const ALT_COVERAGE_THRESHOLD: f64 = 0.8;
const PERFORMANCE_FRACTION_THRESHOLD: f64 = 0.7;
/// Titles shorter than the optimal window's lower bound trigger the title
/// recommendation.
const TITLE_MIN_LEN: usize = 50;

pub struct RecommendationEngine {
    llm: Option<CompletionClient>,
}

impl RecommendationEngine {
    pub fn new(llm: Option<CompletionClient>) -> Self {
        Self { llm }
    }

    /// Produce at most 3 unique, prioritized recommendations. Infallible:
    /// any fault in the AI path falls through to the deterministic table.
    pub async fn recommend(
        &self,
        scores: &CategoryScores,
        findings: &ProbeFindings,
    ) -> Vec<Recommendation> {
        if let Some(client) = &self.llm {
            match ai_recommendations(client, scores, findings).await {
                Ok(recommendations) => return recommendations,
                Err(e) => warn!("AI recommendation path failed, using fallback: {}", e),
            }
        }
        fallback_recommendations(scores, findings)
    }
}

/// Categories below the improvement threshold, worst first. Ties keep the
/// enumeration order SEO, Performance, Accessibility, Best Practices.
pub fn weak_areas(scores: &CategoryScores) -> Vec<(Category, u8)> {
    let mut weak: Vec<(Category, u8)> = [
        (Category::Seo, scores.seo),
        (Category::Performance, scores.performance),
        (Category::Accessibility, scores.accessibility),
        (Category::BestPractices, scores.best_practices),
    ]
    .into_iter()
    .filter(|(_, score)| *score < IMPROVEMENT_THRESHOLD)
    .collect();
    weak.sort_by_key(|(_, score)| *score);
    weak
}

// ---------------------------------------------------------------------------
// AI path
// ---------------------------------------------------------------------------

async fn ai_recommendations(
    client: &CompletionClient,
    scores: &CategoryScores,
    findings: &ProbeFindings,
) -> Result<Vec<Recommendation>, CompletionError> {
    let weak = weak_areas(scores);
    let prompt = build_prompt(scores, findings, &weak);

    let text = client
        .complete(&prompt, COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE)
        .await?;

    let json = extract_json_array(&text);
    let parsed: Vec<Recommendation> = serde_json::from_str(json)
        .map_err(|e| CompletionError::Malformed(e.to_string()))?;

    let targeting_weak_areas = !weak.is_empty();
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for recommendation in parsed {
        // Recommendations aimed at a healthy category are rejected while
        // weak areas exist; unscored categories pass through.
        if targeting_weak_areas
            && scores
                .get(recommendation.category)
                .is_some_and(|score| score >= IMPROVEMENT_THRESHOLD)
        {
            debug!(
                "Dropping recommendation for healthy category {}",
                recommendation.category.as_str()
            );
            continue;
        }

        let key = recommendation.dedup_key();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        unique.push(recommendation);
        if unique.len() >= MAX_RECOMMENDATIONS {
            break;
        }
    }

    Ok(unique)
}

/// LLM responses often arrive wrapped in a fenced code block; pull the
/// bracketed array out before parsing.
fn extract_json_array(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let fence = Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").unwrap();
        if let Some(captures) = fence.captures(trimmed) {
            return captures.get(1).map_or(trimmed, |m| m.as_str());
        }
    }
    trimmed
}

fn build_prompt(
    scores: &CategoryScores,
    findings: &ProbeFindings,
    weak: &[(Category, u8)],
) -> String {
    let focus = if weak.is_empty() {
        "All areas are performing well (scores of 90 or above). Provide general \
         optimization recommendations to further improve the overall score."
            .to_string()
    } else {
        let areas = weak
            .iter()
            .map(|(category, score)| format!("{} ({}/100)", category.as_str(), score))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Focus recommendations ONLY on these areas that need improvement: {}. \
             Do NOT provide recommendations for areas with scores of 90 or above.",
            areas
        )
    };

    let summary = serde_json::json!({
        "current_scores": {
            "seo": scores.seo,
            "performance": scores.performance,
            "accessibility": scores.accessibility,
            "best_practices": scores.best_practices,
            "overall": scores.overall(),
        },
        "areas_needing_improvement": weak
            .iter()
            .map(|(category, _)| category.as_str())
            .collect::<Vec<_>>(),
        "seo": &findings.seo,
        "performance": &findings.performance,
        "content": &findings.content,
        "technical": &findings.technical,
        "core_web_vitals": findings
            .performance
            .findings()
            .map(|report| &report.core_web_vitals),
    });
    let summary =
        serde_json::to_string_pretty(&summary).unwrap_or_else(|_| summary.to_string());

    format!(
        r#"You are a website improvement advisor. Analyze this website data and provide up to 3 actionable recommendations to improve the overall website score.

INSTRUCTIONS:
1. {focus}
2. Write in simple, plain English that anyone can understand. Explain technical terms when you must use them.
3. Each recommendation must be unique and address a different issue.
4. Each must be specific and actionable: tell the reader exactly what to do, where to go, or what tools to use, step by step.

Return a JSON array with up to 3 unique items in this format:
[
    {{
        "category": "SEO|Performance|Accessibility|Best Practices|Content|Technical",
        "title": "Short, simple title",
        "description": "What the problem is, why it matters, and exact steps to fix it.",
        "impact": "High|Medium|Low"
    }}
]

Analysis data:
{summary}
"#
    )
}

// ---------------------------------------------------------------------------
// Fallback path
// ---------------------------------------------------------------------------

/// Deterministic recommendations from the already-collected findings. One
/// recommendation per weak category, first matching table entry wins.
pub fn fallback_recommendations(
    scores: &CategoryScores,
    findings: &ProbeFindings,
) -> Vec<Recommendation> {
    if findings.performance.is_failed() {
        return vec![Recommendation {
            category: Category::Performance,
            title: "PageSpeed Analysis Unavailable".to_string(),
            description: "Unable to analyze website performance. Please check your \
                          PageSpeed API key configuration."
                .to_string(),
            impact: Impact::High,
        }];
    }

    let weak = weak_areas(scores);
    if weak.is_empty() {
        return vec![Recommendation {
            category: Category::Performance,
            title: "Keep Monitoring Your Website".to_string(),
            description: "All scored areas are at 90 or above. Re-run the analysis \
                          after content or infrastructure changes to catch regressions \
                          early."
                .to_string(),
            impact: Impact::Low,
        }];
    }

    let mut recommendations = Vec::new();
    for (category, score) in weak {
        let next = match category {
            Category::Seo => seo_recommendation(findings),
            Category::Performance => performance_recommendation(findings),
            Category::Accessibility => Some(accessibility_recommendation(score)),
            Category::BestPractices => Some(best_practices_recommendation(findings, score)),
            Category::Content | Category::Technical => None,
        };
        if let Some(recommendation) = next {
            recommendations.push(recommendation);
        }
        if recommendations.len() >= MAX_RECOMMENDATIONS {
            break;
        }
    }

    recommendations
}

fn seo_recommendation(findings: &ProbeFindings) -> Option<Recommendation> {
    let seo = findings.seo.findings()?;

    if seo.title.length < TITLE_MIN_LEN {
        return Some(Recommendation {
            category: Category::Seo,
            title: "Improve Your Page Title".to_string(),
            description: format!(
                "Your page title is too short (currently {} characters). Add more \
                 descriptive words about what your page is about, aiming for 50-60 \
                 characters total. You can edit this in your website settings or \
                 content management system.",
                seo.title.length
            ),
            impact: Impact::High,
        });
    }

    if seo.meta_description.text.is_empty() {
        return Some(Recommendation {
            category: Category::Seo,
            title: "Add a Page Description".to_string(),
            description: "Your page is missing a description that helps search engines \
                          understand your content. Add a compelling description between \
                          150-160 characters that explains what your page is about."
                .to_string(),
            impact: Impact::High,
        });
    }

    if seo.images.alt_coverage < ALT_COVERAGE_THRESHOLD {
        return Some(Recommendation {
            category: Category::Seo,
            title: "Add Descriptions to Your Images".to_string(),
            description: "Some of your images are missing descriptions (alt text). \
                          This helps search engines understand your images and improves \
                          accessibility. Add a short description of what each image \
                          shows when uploading, or edit existing images in your website \
                          editor."
                .to_string(),
            impact: Impact::Medium,
        });
    }

    None
}

fn performance_recommendation(findings: &ProbeFindings) -> Option<Recommendation> {
    let report = findings.performance.findings()?;

    if let Some(lcp) = &report.core_web_vitals.lcp {
        if lcp.value > LCP_THRESHOLD_MS {
            return Some(Recommendation {
                category: Category::Performance,
                title: "Speed Up Your Website Loading".to_string(),
                description: format!(
                    "Your website takes too long to show its main content ({}). Make \
                     your images smaller before uploading them; free tools like \
                     TinyPNG.com or Squoosh.app compress images without visible quality \
                     loss. Upload your image, download the compressed version, and \
                     replace it on your website.",
                    if lcp.display_value.is_empty() {
                        "too long"
                    } else {
                        &lcp.display_value
                    }
                ),
                impact: Impact::High,
            });
        }
    }

    let fraction = report
        .categories
        .performance
        .as_ref()
        .map(|c| c.score)
        .unwrap_or(0.0);
    if fraction < PERFORMANCE_FRACTION_THRESHOLD {
        return Some(Recommendation {
            category: Category::Performance,
            title: "Improve Your Website Speed".to_string(),
            description: format!(
                "Your website is loading slowly (Performance score: {}/100). Compress \
                 your images with free tools like TinyPNG.com, and consider a content \
                 delivery network (CDN) if you have many visitors. Your hosting \
                 provider can help set one up.",
                (fraction * 100.0) as u8
            ),
            impact: Impact::High,
        });
    }

    None
}

fn accessibility_recommendation(score: u8) -> Recommendation {
    Recommendation {
        category: Category::Accessibility,
        title: "Improve Website Accessibility".to_string(),
        description: format!(
            "Your website accessibility score is {}/100. Add descriptions (alt text) \
             to all images, ensure text has good contrast with backgrounds, and make \
             sure all buttons and links are clearly labeled. This helps people with \
             disabilities use your website and improves your search rankings.",
            score
        ),
        impact: Impact::Medium,
    }
}

fn best_practices_recommendation(findings: &ProbeFindings, score: u8) -> Recommendation {
    let has_https = findings
        .technical
        .findings()
        .map(|report| report.https)
        .unwrap_or(true);

    if !has_https {
        return Recommendation {
            category: Category::BestPractices,
            title: "Enable Secure Connection (HTTPS)".to_string(),
            description: "Your website is not using a secure connection (HTTPS). This \
                          is important for protecting visitor information and improving \
                          search rankings. Contact your web hosting provider to enable \
                          SSL/HTTPS; most providers offer it for free."
                .to_string(),
            impact: Impact::High,
        };
    }

    Recommendation {
        category: Category::BestPractices,
        title: "Improve Website Security".to_string(),
        description: format!(
            "Your website security practices score is {}/100. Ensure your website \
             sends the standard security headers and keep all software up to date. \
             Your web developer or hosting provider can assist with security \
             improvements.",
            score
        ),
        impact: Impact::Medium,
    }
}
