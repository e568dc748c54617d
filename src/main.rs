mod aggregate;
mod catalog;
mod fetcher;
mod parser;
mod report;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use aggregate::Pass;
use catalog::{CATEGORIES, LECTURE_URLS};
use fetcher::{HttpFetcher, PageSource};
use parser::heading::{KeywordMatcher, MatchMode};

#[derive(Parser)]
#[command(
    name = "lecture_scraper",
    about = "Collect comprehension checks and SQL drills from lecture pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every lecture page and write one HTML report per category
    Run {
        /// Directory the reports are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Match heading ids case-insensitively
        #[arg(long)]
        ignore_case: bool,
        /// Skip the per-section console listing
        #[arg(short, long)]
        quiet: bool,
    },
    /// Extract sections from a single page and print them
    Extract {
        #[arg(short, long)]
        url: String,
        /// Substring to look for in h3 ids
        #[arg(short, long)]
        keyword: String,
        #[arg(long)]
        ignore_case: bool,
        /// Print sections as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in lecture pages
    Urls,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            out_dir,
            ignore_case,
            quiet,
        } => run(out_dir, match_mode(ignore_case), quiet).await,
        Commands::Extract {
            url,
            keyword,
            ignore_case,
            json,
        } => {
            let matcher = KeywordMatcher::new(&keyword, match_mode(ignore_case))?;
            let fetcher = HttpFetcher::new()?;
            let html = fetcher
                .fetch(&url)
                .await
                .with_context(|| format!("fetching {}", url))?;
            let sections = parser::process_page(&url, &html, std::slice::from_ref(&matcher))?
                .pop()
                .unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            } else {
                report::print_listing(&keyword, &sections);
                println!("\n{} sections", sections.len());
            }
            Ok(())
        }
        Commands::Urls => {
            for url in LECTURE_URLS {
                println!("{:<8} {}", catalog::lecture_label(url), url);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn match_mode(ignore_case: bool) -> MatchMode {
    if ignore_case {
        MatchMode::IgnoreCase
    } else {
        MatchMode::CaseSensitive
    }
}

async fn run(out_dir: PathBuf, mode: MatchMode, quiet: bool) -> anyhow::Result<()> {
    let matchers = CATEGORIES
        .iter()
        .map(|c| c.matcher(mode))
        .collect::<Result<Vec<_>, _>>()?;
    let passes: Vec<Pass> = CATEGORIES
        .iter()
        .zip(&matchers)
        .map(|(c, matcher)| Pass {
            label: c.label,
            matcher,
        })
        .collect();

    let fetcher = HttpFetcher::new()?;

    println!("定着確認問題とSQLドリルを収集中...");
    println!("{}", "=".repeat(60));

    let pb = ProgressBar::new(LECTURE_URLS.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let collected = aggregate::collect(&fetcher, LECTURE_URLS, &passes, &pb).await;
    pb.finish_and_clear();

    if !collected.failures.is_empty() {
        warn!(
            "{} of {} pages failed and contributed no sections",
            collected.failures.len(),
            LECTURE_URLS.len()
        );
        for failure in &collected.failures {
            println!("エラーが発生しました（URL: {}）: {}", failure.url, failure.error);
        }
    }

    let totals: Vec<String> = CATEGORIES
        .iter()
        .zip(&collected.by_category)
        .map(|(c, sections)| format!("{} {}個", c.label, sections.len()))
        .collect();
    println!("\n{}", "=".repeat(60));
    println!("合計: {}を収集しました", totals.join("、"));

    if !quiet {
        for (category, sections) in CATEGORIES.iter().zip(&collected.by_category) {
            report::print_listing(category.label, sections);
        }
    }

    println!();
    for (category, sections) in CATEGORIES.iter().zip(&collected.by_category) {
        let path = out_dir.join(category.output_file);
        report::write_report(&path, sections, category.report_title)?;
        println!("{}を {} に保存しました", category.label, path.display());
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
