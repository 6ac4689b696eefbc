use colored::Color;
use sitegauge::handlers::{parse_url_line, score_color};

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com");
    assert_eq!(result, Some("http://example.com".to_string()));
}

#[test]
fn test_parse_url_line_trims_whitespace() {
    let result = parse_url_line("  example.com  ");
    assert_eq!(result, Some("http://example.com".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    assert_eq!(parse_url_line("not a valid url!!!"), None);
    assert_eq!(parse_url_line(""), None);
    assert_eq!(parse_url_line("   "), None);
}

#[test]
fn test_score_color_buckets() {
    assert_eq!(score_color(100), Color::Green);
    assert_eq!(score_color(90), Color::Green);
    assert_eq!(score_color(89), Color::Yellow);
    assert_eq!(score_color(50), Color::Yellow);
    assert_eq!(score_color(49), Color::Red);
    assert_eq!(score_color(0), Color::Red);
}
