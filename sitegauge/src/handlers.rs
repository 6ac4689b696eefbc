use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use sitegauge_core::report::{self, ReportFormat};
use sitegauge_core::store::ResultStore;
use sitegauge_core::{AnalysisResult, AnalyzerConfig, SqliteStore, WebsiteAnalyzer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub fn print_banner() {
    println!("{}", "  sitegauge".cyan().bold());
    println!("{}", "  website analysis, scored and explained".dimmed());
    println!();
}

/// Normalize one line of user input into an absolute URL string. Bare
/// hostnames get an http scheme; anything that still fails to parse or has
/// no host is rejected.
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let candidate = if line.contains("://") {
        line.to_string()
    } else {
        format!("http://{}", line)
    };
    let parsed = Url::parse(&candidate).ok()?;
    if !parsed.has_host() {
        return None;
    }
    Some(candidate)
}

pub fn score_color(score: u8) -> Color {
    match score {
        90..=100 => Color::Green,
        50..=89 => Color::Yellow,
        _ => Color::Red,
    }
}

fn expanded_db_path(args: &ArgMatches) -> PathBuf {
    let raw = args.get_one::<String>("db").expect("db has a default");
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn requester() -> String {
    std::env::var("USER").unwrap_or_else(|_| "cli".to_string())
}

pub fn handle_init(args: &ArgMatches) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let dir = args.get_one::<String>("PATH").unwrap();
    let force = args.get_flag("force");
    let expanded = shellexpand::tilde(dir);
    let config_dir = Path::new(expanded.as_ref());
    let db_path = config_dir.join("sitegauge.db");

    spinner.set_message("Creating configuration directory...");
    fs::create_dir_all(config_dir).expect("Failed to create config directory");

    if SqliteStore::exists(&db_path) {
        if !force {
            spinner.finish_with_message(format!(
                "Database already exists at {} (use --force to recreate)",
                db_path.display()
            ));
            return;
        }
        spinner.set_message("Deleting existing database...");
        SqliteStore::drop(&db_path);
    }

    spinner.set_message(format!("Initializing database at {}", db_path.display()));
    SqliteStore::new(&db_path).expect("Failed to create database");

    spinner.finish_with_message(format!(
        "✓ Sitegauge initialized. Database: {}",
        db_path.display()
    ));
}

pub async fn handle_analyze(args: &ArgMatches) -> Result<()> {
    let raw_url = args.get_one::<String>("url").unwrap();
    let url = parse_url_line(raw_url).ok_or_else(|| anyhow!("Invalid URL: {raw_url}"))?;

    let db_path = expanded_db_path(args);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let store = SqliteStore::new(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let no_ai = args.get_flag("no-ai");
    let config = AnalyzerConfig {
        pagespeed_api_key: std::env::var("GOOGLE_PAGESPEED_API_KEY").ok(),
        llm_api_key: if no_ai {
            None
        } else {
            std::env::var("OPENAI_API_KEY").ok()
        },
        ..AnalyzerConfig::default()
    };
    if config.pagespeed_api_key.is_none() {
        eprintln!(
            "{}",
            "Warning: GOOGLE_PAGESPEED_API_KEY not set; scores will be unavailable."
                .yellow()
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Analyzing {}", url));

    let analyzer = WebsiteAnalyzer::new(config, Arc::new(store));
    let result = analyzer.analyze(&url, &requester()).await;
    spinner.finish_and_clear();

    let result = result?;
    print_score_summary(&result);
    render(args, &result)
}

pub async fn handle_report(args: &ArgMatches) -> Result<()> {
    let raw_url = args.get_one::<String>("url").unwrap();
    let url = parse_url_line(raw_url).ok_or_else(|| anyhow!("Invalid URL: {raw_url}"))?;
    // Match the canonical form the analyzer stores under.
    let url = Url::parse(&url)?.to_string();

    let db_path = expanded_db_path(args);
    let store = SqliteStore::new(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let Some(entry) = store.get(&url)? else {
        bail!("No cached analysis for {url}; run `sitegauge analyze` first");
    };

    print_score_summary(&entry.result);
    render(args, &entry.result)
}

fn print_score_summary(result: &AnalysisResult) {
    println!("\n{}\n", "✓ Analysis complete".green());
    let line = |name: &str, score: u8| {
        println!(
            "  {:<16} {}",
            name,
            format!("{score:>3}/100").color(score_color(score))
        );
    };
    line("SEO", result.scores.seo);
    line("Performance", result.scores.performance);
    line("Accessibility", result.scores.accessibility);
    line("Best Practices", result.scores.best_practices);
    line("Overall", result.scores.overall());
    println!();
}

fn render(args: &ArgMatches, result: &AnalysisResult) -> Result<()> {
    let format = args
        .get_one::<String>("format")
        .and_then(|s| ReportFormat::from_str(s))
        .unwrap_or(ReportFormat::Text);

    let content = match format {
        ReportFormat::Text => report::generate_text_report(result),
        ReportFormat::Json => report::generate_json_report(result)?,
        ReportFormat::Markdown => report::generate_markdown_report(result),
    };

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            report::save_report(&content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("Report saved to {}", path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}
