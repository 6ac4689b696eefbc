use crate::error::Result;
use crate::fetch::fetch_page;
use crate::report::{
    DescriptionCheck, HeadingOutline, ImageAltStats, LinkCounts, MetaTagChecks, SeoReport,
    TitleCheck, UrlShape,
};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const TITLE_OPTIMAL: std::ops::RangeInclusive<usize> = 50..=60;
const DESCRIPTION_OPTIMAL: std::ops::RangeInclusive<usize> = 150..=160;

pub async fn run(client: &Client, target: &Url) -> Result<SeoReport> {
    let page = fetch_page(client, target).await?;
    debug!("SEO probe fetched {} ({} bytes)", target, page.body.len());
    Ok(parse_report(&page.body, target))
}

/// Parsing is synchronous so the probe future never holds a DOM across an
/// await point.
fn parse_report(html: &str, target: &Url) -> SeoReport {
    let document = Html::parse_document(html);

    let title_text = select_text(&document, "title");
    let description_text = meta_content(&document, r#"meta[name="description"]"#);

    let images = image_stats(&document);
    let links = link_counts(&document, target);

    let structured_data = count(&document, r#"script[type="application/ld+json"]"#) > 0;

    let meta_tags = MetaTagChecks {
        viewport: count(&document, r#"meta[name="viewport"]"#) > 0,
        robots: count(&document, r#"meta[name="robots"]"#) > 0,
        canonical: count(&document, r#"link[rel="canonical"]"#) > 0,
        og_title: count(&document, r#"meta[property="og:title"]"#) > 0,
        og_description: count(&document, r#"meta[property="og:description"]"#) > 0,
        twitter_card: count(&document, r#"meta[name="twitter:card"]"#) > 0,
    };

    SeoReport {
        title: TitleCheck {
            length: title_text.chars().count(),
            optimal: TITLE_OPTIMAL.contains(&title_text.chars().count()),
            text: title_text,
        },
        meta_description: DescriptionCheck {
            length: description_text.chars().count(),
            optimal: DESCRIPTION_OPTIMAL.contains(&description_text.chars().count()),
            text: description_text,
        },
        headings: heading_outline(&document),
        images,
        links,
        structured_data,
        meta_tags,
        url_shape: UrlShape {
            https: target.scheme() == "https",
            www: target.as_str().contains("www."),
            length: target.as_str().len(),
        },
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

fn count(document: &Html, css: &str) -> usize {
    document.select(&selector(css)).count()
}

fn select_text(document: &Html, css: &str) -> String {
    document
        .select(&selector(css))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn meta_content(document: &Html, css: &str) -> String {
    document
        .select(&selector(css))
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn heading_outline(document: &Html) -> HeadingOutline {
    let texts = |tag: &str| {
        document
            .select(&selector(tag))
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect::<Vec<_>>()
    };
    HeadingOutline {
        h1: texts("h1"),
        h2: texts("h2"),
        h3: texts("h3"),
        h4: texts("h4"),
        h5: texts("h5"),
        h6: texts("h6"),
    }
}

fn image_stats(document: &Html) -> ImageAltStats {
    let mut total = 0;
    let mut with_alt = 0;
    for img in document.select(&selector("img")) {
        total += 1;
        if img.value().attr("alt").is_some_and(|alt| !alt.is_empty()) {
            with_alt += 1;
        }
    }
    ImageAltStats {
        total,
        with_alt,
        without_alt: total - with_alt,
        alt_coverage: if total > 0 {
            with_alt as f64 / total as f64
        } else {
            0.0
        },
    }
}

fn link_counts(document: &Html, target: &Url) -> LinkCounts {
    let target_host = target.host_str().unwrap_or_default();
    let mut counts = LinkCounts::default();

    for anchor in document.select(&selector("a[href]")) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.starts_with("http") {
            match Url::parse(href) {
                Ok(parsed) if parsed.host_str() == Some(target_host) => counts.internal += 1,
                Ok(_) => counts.external += 1,
                Err(_) => {}
            }
        } else if href.starts_with('/') {
            counts.internal += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html>
<head>
    <title>Grow Better Tomatoes: A Complete Backyard Gardening Guide</title>
    <meta name="description" content="short description">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="canonical" href="https://example.com/tomatoes">
    <meta property="og:title" content="Grow Better Tomatoes">
    <script type="application/ld+json">{"@type": "Article"}</script>
</head>
<body>
    <h1>Growing Tomatoes</h1>
    <h2>Soil</h2>
    <h2>Watering</h2>
    <img src="a.jpg" alt="a ripe tomato">
    <img src="b.jpg" alt="">
    <img src="c.jpg">
    <a href="/soil">Soil guide</a>
    <a href="https://example.com/water">Watering</a>
    <a href="https://other.example.org/ref">Reference</a>
</body>
</html>"#;

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn extracts_title_and_meta_checks() {
        let server = serve(PAGE).await;
        let client = fetch::build_client(5);
        let target = Url::parse(&server.uri()).unwrap();

        let report = run(&client, &target).await.unwrap();

        assert_eq!(report.title.length, 57);
        assert!(report.title.optimal);
        assert!(!report.meta_description.optimal);
        assert!(report.meta_tags.viewport);
        assert!(report.meta_tags.canonical);
        assert!(report.meta_tags.og_title);
        assert!(!report.meta_tags.og_description);
        assert!(!report.meta_tags.robots);
        assert!(!report.meta_tags.twitter_card);
        assert!(report.structured_data);
    }

    #[tokio::test]
    async fn counts_headings_images_and_links() {
        let server = serve(PAGE).await;
        let client = fetch::build_client(5);
        let target = Url::parse(&server.uri()).unwrap();

        let report = run(&client, &target).await.unwrap();

        assert_eq!(report.headings.h1.len(), 1);
        assert_eq!(report.headings.h2, vec!["Soil", "Watering"]);
        assert_eq!(report.images.total, 3);
        assert_eq!(report.images.with_alt, 1);
        assert_eq!(report.images.without_alt, 2);
        assert!((report.images.alt_coverage - 1.0 / 3.0).abs() < 1e-9);

        // Absolute link to another host is external, the mock server links
        // in the fixture point elsewhere so only the root-relative one is
        // internal here.
        assert_eq!(report.links.internal, 1);
        assert_eq!(report.links.external, 2);
    }

    #[tokio::test]
    async fn empty_page_has_zero_coverage() {
        let server = serve("<html><head></head><body></body></html>").await;
        let client = fetch::build_client(5);
        let target = Url::parse(&server.uri()).unwrap();

        let report = run(&client, &target).await.unwrap();

        assert_eq!(report.title.text, "");
        assert!(!report.title.optimal);
        assert_eq!(report.images.total, 0);
        assert_eq!(report.images.alt_coverage, 0.0);
        assert!(!report.structured_data);
    }
}
