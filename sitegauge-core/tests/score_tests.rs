// Tests for score normalization

use sitegauge_core::score::normalize;
use sitegauge_probes::report::{
    CategoryAudit, CategoryAudits, CoreWebVitals, PageSpeedReport, ProbeResult,
};

fn audit(score: f64) -> Option<CategoryAudit> {
    Some(CategoryAudit {
        score,
        title: String::new(),
        description: String::new(),
    })
}

fn report(perf: f64, acc: f64, bp: f64, seo: f64) -> ProbeResult<PageSpeedReport> {
    ProbeResult::Ok {
        findings: PageSpeedReport {
            categories: CategoryAudits {
                performance: audit(perf),
                accessibility: audit(acc),
                best_practices: audit(bp),
                seo: audit(seo),
            },
            core_web_vitals: CoreWebVitals::default(),
            opportunities: Vec::new(),
            diagnostics: Vec::new(),
        },
    }
}

// ============================================================================
// Normalization Tests
// ============================================================================

#[test]
fn test_fractions_round_to_integer_scores() {
    let scores = normalize(&report(0.82, 0.955, 0.744, 0.91));

    assert_eq!(scores.performance, 82);
    assert_eq!(scores.accessibility, 96);
    assert_eq!(scores.best_practices, 74);
    assert_eq!(scores.seo, 91);
}

#[test]
fn test_scores_clamp_to_valid_range() {
    let scores = normalize(&report(1.0, 0.0, 1.2, -0.1));

    assert_eq!(scores.performance, 100);
    assert_eq!(scores.accessibility, 0);
    assert_eq!(scores.best_practices, 100);
    assert_eq!(scores.seo, 0);
}

#[test]
fn test_failed_probe_scores_all_zero() {
    let failed: ProbeResult<PageSpeedReport> = ProbeResult::failed("403 from service");
    let scores = normalize(&failed);

    assert_eq!(scores.seo, 0);
    assert_eq!(scores.performance, 0);
    assert_eq!(scores.accessibility, 0);
    assert_eq!(scores.best_practices, 0);
}

#[test]
fn test_missing_category_scores_zero() {
    let partial = ProbeResult::Ok {
        findings: PageSpeedReport {
            categories: CategoryAudits {
                performance: audit(0.5),
                accessibility: None,
                best_practices: None,
                seo: None,
            },
            core_web_vitals: CoreWebVitals::default(),
            opportunities: Vec::new(),
            diagnostics: Vec::new(),
        },
    };
    let scores = normalize(&partial);

    assert_eq!(scores.performance, 50);
    assert_eq!(scores.accessibility, 0);
    assert_eq!(scores.best_practices, 0);
    assert_eq!(scores.seo, 0);
}

// ============================================================================
// Overall Score Tests
// ============================================================================

#[test]
fn test_overall_is_floor_average() {
    let scores = normalize(&report(0.82, 0.95, 0.74, 0.91));
    // (82 + 95 + 74 + 91) / 4 = 85.5, floored.
    assert_eq!(scores.overall(), 85);
}

#[test]
fn test_overall_of_zeros_is_zero() {
    let failed: ProbeResult<PageSpeedReport> = ProbeResult::failed("down");
    assert_eq!(normalize(&failed).overall(), 0);
}
