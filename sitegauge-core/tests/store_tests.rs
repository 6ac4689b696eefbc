// Tests for the result store

use chrono::Utc;
use sitegauge_core::model::{
    AnalysisResult, Category, CategoryScores, Impact, ProbeFindings, Recommendation,
};
use sitegauge_core::store::{MemoryStore, ResultStore, SqliteStore};
use sitegauge_probes::report::ProbeResult;
use tempfile::TempDir;

fn sample_result(url: &str, seo_score: u8) -> AnalysisResult {
    AnalysisResult {
        url: url.to_string(),
        analyzed_at: Utc::now(),
        scores: CategoryScores {
            seo: seo_score,
            performance: 70,
            accessibility: 80,
            best_practices: 90,
        },
        findings: ProbeFindings {
            seo: ProbeResult::failed("connection refused"),
            performance: ProbeResult::failed("no API key"),
            content: ProbeResult::failed("connection refused"),
            technical: ProbeResult::failed("connection refused"),
        },
        recommendations: vec![Recommendation {
            category: Category::Performance,
            title: "PageSpeed Analysis Unavailable".to_string(),
            description: "Unable to analyze website performance.".to_string(),
            impact: Impact::High,
        }],
    }
}

// ============================================================================
// Sqlite Store Tests
// ============================================================================

#[test]
fn test_store_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let store = SqliteStore::new(&db_path);
    assert!(store.is_ok());
    assert!(SqliteStore::exists(&db_path));
}

#[test]
fn test_get_missing_url_is_none() {
    let store = SqliteStore::in_memory().unwrap();
    assert!(store.get("https://example.com/").unwrap().is_none());
}

#[test]
fn test_put_then_get_roundtrip() {
    let store = SqliteStore::in_memory().unwrap();
    let result = sample_result("https://example.com/", 60);

    store.put("https://example.com/", &result, "tester").unwrap();

    let entry = store.get("https://example.com/").unwrap().unwrap();
    assert_eq!(entry.url, "https://example.com/");
    assert_eq!(entry.result, result);
}

#[test]
fn test_put_overwrites_existing_row() {
    let store = SqliteStore::in_memory().unwrap();
    let first = sample_result("https://example.com/", 60);
    let second = sample_result("https://example.com/", 75);

    store.put("https://example.com/", &first, "tester").unwrap();
    store.put("https://example.com/", &second, "tester").unwrap();

    let entry = store.get("https://example.com/").unwrap().unwrap();
    assert_eq!(entry.result.scores.seo, 75);
}

#[test]
fn test_urls_are_independent_keys() {
    let store = SqliteStore::in_memory().unwrap();
    store
        .put("https://a.example.com/", &sample_result("https://a.example.com/", 10), "t")
        .unwrap();
    store
        .put("https://b.example.com/", &sample_result("https://b.example.com/", 20), "t")
        .unwrap();

    assert_eq!(
        store.get("https://a.example.com/").unwrap().unwrap().result.scores.seo,
        10
    );
    assert_eq!(
        store.get("https://b.example.com/").unwrap().unwrap().result.scores.seo,
        20
    );
}

// ============================================================================
// Memory Store Tests
// ============================================================================

#[test]
fn test_memory_store_roundtrip() {
    let store = MemoryStore::new();
    let result = sample_result("https://example.com/", 60);

    assert!(store.get("https://example.com/").unwrap().is_none());
    store.put("https://example.com/", &result, "tester").unwrap();

    let entry = store.get("https://example.com/").unwrap().unwrap();
    assert_eq!(entry.result, result);
    assert_eq!(entry.analyzed_at, result.analyzed_at);
}
