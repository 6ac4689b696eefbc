// Report rendering for completed analyses

use crate::model::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

pub fn generate_text_report(result: &AnalysisResult) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                       SITEGAUGE WEBSITE ANALYSIS REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("URL:          {}\n", result.url));
    report.push_str(&format!(
        "Analyzed:     {}\n",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("SCORES\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("  SEO             {:>3}/100\n", result.scores.seo));
    report.push_str(&format!(
        "  Performance     {:>3}/100\n",
        result.scores.performance
    ));
    report.push_str(&format!(
        "  Accessibility   {:>3}/100\n",
        result.scores.accessibility
    ));
    report.push_str(&format!(
        "  Best Practices  {:>3}/100\n",
        result.scores.best_practices
    ));
    report.push_str(&format!(
        "  Overall         {:>3}/100\n",
        result.scores.overall()
    ));
    report.push('\n');

    let probe_status = |name: &str, reason: Option<&str>| match reason {
        None => format!("  {:<12} ok\n", name),
        Some(reason) => format!("  {:<12} FAILED: {}\n", name, reason),
    };
    report.push_str("Probes:\n");
    report.push_str(&probe_status("seo", result.findings.seo.failure_reason()));
    report.push_str(&probe_status(
        "performance",
        result.findings.performance.failure_reason(),
    ));
    report.push_str(&probe_status(
        "content",
        result.findings.content.failure_reason(),
    ));
    report.push_str(&probe_status(
        "technical",
        result.findings.technical.failure_reason(),
    ));
    report.push('\n');

    if !result.recommendations.is_empty() {
        report.push_str(RULE);
        report.push_str("RECOMMENDATIONS\n");
        report.push_str(RULE);
        report.push('\n');

        for (idx, rec) in result.recommendations.iter().enumerate() {
            report.push_str(&format!("[{}] {}\n", idx + 1, rec.title));
            report.push_str(&format!("Category:     {}\n", rec.category.as_str()));
            report.push_str(&format!("Impact:       {}\n", rec.impact.as_str()));
            report.push('\n');
            report.push_str(&wrap_text(&rec.description, 80, "  "));
            report.push('\n');
        }
    }

    report.push_str(RULE);
    report.push_str("                              End of Report\n");
    report.push_str(RULE);
    report.push_str("\nGenerated by Sitegauge\n");

    report
}

pub fn generate_json_report(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitegauge",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "url": result.url,
            "analyzed_at": result.analyzed_at.to_rfc3339(),
            "scores": {
                "seo": result.scores.seo,
                "performance": result.scores.performance,
                "accessibility": result.scores.accessibility,
                "best_practices": result.scores.best_practices,
                "overall": result.scores.overall()
            },
            "findings": result.findings,
            "recommendations": result.recommendations
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(result: &AnalysisResult) -> String {
    let mut report = String::new();

    report.push_str("# Sitegauge Analysis Report\n\n");
    report.push_str(&format!("- **URL**: {}\n", result.url));
    report.push_str(&format!(
        "- **Analyzed**: {}\n\n",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    report.push_str("## Scores\n\n");
    report.push_str("| Category | Score |\n|---|---|\n");
    report.push_str(&format!("| SEO | {} |\n", result.scores.seo));
    report.push_str(&format!("| Performance | {} |\n", result.scores.performance));
    report.push_str(&format!(
        "| Accessibility | {} |\n",
        result.scores.accessibility
    ));
    report.push_str(&format!(
        "| Best Practices | {} |\n",
        result.scores.best_practices
    ));
    report.push_str(&format!("| **Overall** | {} |\n\n", result.scores.overall()));

    if !result.recommendations.is_empty() {
        report.push_str("## Recommendations\n\n");
        for rec in &result.recommendations {
            report.push_str(&format!(
                "### {} ({}, {} impact)\n\n{}\n\n",
                rec.title,
                rec.category.as_str(),
                rec.impact.as_str(),
                rec.description
            ));
        }
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() {
            if !current_line.is_empty() {
                result.push_str(indent);
                result.push_str(&current_line);
                result.push('\n');
                current_line.clear();
            }
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
