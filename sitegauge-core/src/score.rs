//! Score normalization. All four category scores come exclusively from the
//! speed-scoring service's category fractions; the other probes' findings
//! feed recommendation text only.

use crate::model::CategoryScores;
use sitegauge_probes::report::{CategoryAudit, PageSpeedReport, ProbeResult};

pub fn normalize(performance: &ProbeResult<PageSpeedReport>) -> CategoryScores {
    let Some(report) = performance.findings() else {
        // A failed probe is indistinguishable from the worst case for
        // scoring purposes: every category reads 0.
        return CategoryScores::default();
    };

    let score = |audit: &Option<CategoryAudit>| {
        audit.as_ref().map(|a| to_score(a.score)).unwrap_or(0)
    };

    CategoryScores {
        seo: score(&report.categories.seo),
        performance: score(&report.categories.performance),
        accessibility: score(&report.categories.accessibility),
        best_practices: score(&report.categories.best_practices),
    }
}

fn to_score(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}
