use crate::error::Result;
use crate::fetch::fetch_page;
use crate::report::{
    ContentReport, ContentStructure, KeywordCount, Readability, ReadabilityLevel,
};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

const STOP_WORDS: [&str; 12] = [
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];
const TOP_KEYWORDS: usize = 10;
const MIN_KEYWORD_LEN: usize = 3;

pub async fn run(client: &Client, target: &Url) -> Result<ContentReport> {
    // Independent fetch; the content probe never shares state with the SEO
    // probe even when both hit the same page.
    let page = fetch_page(client, target).await?;
    debug!("Content probe fetched {} ({} bytes)", target, page.body.len());
    Ok(parse_report(&page.body))
}

fn parse_report(html: &str) -> ContentReport {
    // Script, style and noscript content never counts as page copy.
    let stripped = strip_non_content(html);
    let document = Html::parse_document(&stripped);

    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    let word_count = text.split_whitespace().count();

    let paragraph_sel = Selector::parse("p").unwrap();
    let paragraphs: Vec<String> = document
        .select(&paragraph_sel)
        .map(|p| p.text().collect::<String>())
        .collect();
    let paragraph_count = paragraphs.len();
    let avg_paragraph_words = if paragraph_count > 0 {
        let total: usize = paragraphs.iter().map(|p| p.split_whitespace().count()).sum();
        round2(total as f64 / paragraph_count as f64)
    } else {
        0.0
    };

    let flesch_score = round2(flesch_reading_ease(&text));
    let grade_level = round2(flesch_kincaid_grade(&text));

    let subheading_sel = Selector::parse("h2, h3, h4").unwrap();
    let structure = ContentStructure {
        has_intro: paragraphs
            .iter()
            .take(3)
            .any(|p| p.to_lowercase().contains("introduction")),
        has_conclusion: paragraphs
            .iter()
            .rev()
            .take(3)
            .any(|p| p.to_lowercase().contains("conclusion")),
        has_subheadings: document.select(&subheading_sel).next().is_some(),
    };

    ContentReport {
        word_count,
        paragraph_count,
        avg_paragraph_words,
        readability: Readability {
            flesch_score,
            grade_level,
            label: ReadabilityLevel::from_flesch(flesch_score),
        },
        keywords: top_keywords(&text),
        structure,
    }
}

fn strip_non_content(html: &str) -> String {
    let blocks = Regex::new(
        r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>",
    )
    .unwrap();
    blocks.replace_all(html, " ").into_owned()
}

fn top_keywords(text: &str) -> Vec<KeywordCount> {
    // Count and first-seen position, so ties resolve by encounter order.
    let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next_index = 0usize;

    for word in text.split_whitespace() {
        let term = word
            .trim_matches(|c: char| ".,!?;:\"".contains(c))
            .to_lowercase();
        if term.chars().count() <= MIN_KEYWORD_LEN || STOP_WORDS.contains(&term.as_str()) {
            continue;
        }
        let entry = freq.entry(term).or_insert_with(|| {
            let idx = next_index;
            next_index += 1;
            (0, idx)
        });
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = freq
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked.truncate(TOP_KEYWORDS);

    ranked
        .into_iter()
        .map(|(term, count, _)| KeywordCount { term, count })
        .collect()
}

// Readability formulas over naive word/sentence/syllable counts.

fn flesch_reading_ease(text: &str) -> f64 {
    let (words, sentences, syllables) = text_counts(text);
    if words == 0 {
        return 0.0;
    }
    206.835 - 1.015 * (words as f64 / sentences as f64)
        - 84.6 * (syllables as f64 / words as f64)
}

fn flesch_kincaid_grade(text: &str) -> f64 {
    let (words, sentences, syllables) = text_counts(text);
    if words == 0 {
        return 0.0;
    }
    0.39 * (words as f64 / sentences as f64) + 11.8 * (syllables as f64 / words as f64)
        - 15.59
}

fn text_counts(text: &str) -> (usize, usize, usize) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(|c| c.is_alphanumeric()))
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    (words.len(), sentences, syllables)
}

fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| "aeiouy".contains(c);
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    // Silent trailing e.
    if letters.len() > 2 && letters.ends_with(&['e']) && count > 1 {
        count -= 1;
    }
    count.max(1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn syllable_counts_are_reasonable() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("water"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("the"), 1);
    }

    #[test]
    fn readability_levels_follow_thresholds() {
        assert_eq!(ReadabilityLevel::from_flesch(95.0), ReadabilityLevel::VeryEasy);
        assert_eq!(ReadabilityLevel::from_flesch(85.0), ReadabilityLevel::Easy);
        assert_eq!(ReadabilityLevel::from_flesch(75.0), ReadabilityLevel::FairlyEasy);
        assert_eq!(ReadabilityLevel::from_flesch(65.0), ReadabilityLevel::Standard);
        assert_eq!(
            ReadabilityLevel::from_flesch(55.0),
            ReadabilityLevel::FairlyDifficult
        );
        assert_eq!(ReadabilityLevel::from_flesch(35.0), ReadabilityLevel::Difficult);
        assert_eq!(
            ReadabilityLevel::from_flesch(10.0),
            ReadabilityLevel::VeryDifficult
        );
    }

    #[test]
    fn keywords_rank_by_frequency_then_encounter_order() {
        let text = "garden tomato garden soil tomato garden water soil compost";
        let keywords = top_keywords(text);

        assert_eq!(keywords[0].term, "garden");
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[1].term, "tomato");
        assert_eq!(keywords[2].term, "soil");
        // Single-count terms keep encounter order.
        assert_eq!(keywords[3].term, "water");
        assert_eq!(keywords[4].term, "compost");
    }

    #[test]
    fn keywords_skip_short_and_stop_words() {
        let keywords = top_keywords("with with with cats cats the dog and sun");
        let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
        assert_eq!(terms, vec!["cats"]);
    }

    #[tokio::test]
    async fn strips_script_and_style_text() {
        let server = MockServer::start().await;
        let html = r#"<html><head>
            <style>body { color: red; }</style>
            <script>var hidden = "internals";</script>
        </head><body>
            <h2>Guide</h2>
            <p>Tomatoes grow well in warm soil. Water them daily.</p>
            <p>Conclusion: harvest when red.</p>
        </body></html>"#;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(html),
            )
            .mount(&server)
            .await;

        let client = fetch::build_client(5);
        let target = Url::parse(&server.uri()).unwrap();
        let report = run(&client, &target).await.unwrap();

        // "Guide" + 13 paragraph words; nothing from script or style.
        assert_eq!(report.word_count, 14);
        assert_eq!(report.paragraph_count, 2);
        assert!(report.structure.has_subheadings);
        assert!(report.structure.has_conclusion);
        assert!(!report.structure.has_intro);
        assert!(!report.keywords.iter().any(|k| k.term == "hidden"));
        assert!(!report.keywords.iter().any(|k| k.term == "color"));
    }
}
