use indicatif::ProgressBar;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::lecture_label;
use crate::fetcher::{FetchError, PageSource};
use crate::parser::heading::KeywordMatcher;
use crate::parser::sections::Section;
use crate::parser::{self, ParseError};

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A URL that contributed nothing because it could not be fetched or parsed.
#[derive(Debug)]
pub struct PageFailure {
    pub url: String,
    pub error: PageError,
}

/// Output of one run: one ordered section list per matcher, plus failures.
#[derive(Debug, Default)]
pub struct Collected {
    pub by_category: Vec<Vec<Section>>,
    pub failures: Vec<PageFailure>,
}

/// What a single pass for one category should be called in progress lines.
pub struct Pass<'a> {
    pub label: &'a str,
    pub matcher: &'a KeywordMatcher,
}

/// Fetch and extract one page for every pass.
pub async fn process_url<S: PageSource>(
    source: &S,
    url: &str,
    matchers: &[KeywordMatcher],
) -> Result<Vec<Vec<Section>>, PageError> {
    let html = source.fetch(url).await?;
    Ok(parser::process_page(url, &html, matchers)?)
}

/// Walk `urls` in order, one page at a time, appending each pass's sections
/// to its own list. A failing page is logged, recorded and skipped.
pub async fn collect<S: PageSource>(
    source: &S,
    urls: &[&str],
    passes: &[Pass<'_>],
    pb: &ProgressBar,
) -> Collected {
    let matchers: Vec<KeywordMatcher> = passes.iter().map(|p| p.matcher.clone()).collect();
    let mut collected = Collected {
        by_category: vec![Vec::new(); passes.len()],
        failures: Vec::new(),
    };

    for &url in urls {
        pb.set_message(lecture_label(url));
        pb.suspend(|| println!("\n{} の講義資料を処理中: {}", lecture_label(url), url));

        match process_url(source, url, &matchers).await {
            Ok(per_pass) => {
                for ((pass, found), all) in passes.iter().zip(per_pass).zip(&mut collected.by_category) {
                    if !found.is_empty() {
                        pb.suspend(|| println!("  → {}個の{}セクションを発見", found.len(), pass.label));
                    }
                    all.extend(found);
                }
            }
            Err(error) => {
                warn!("Failed to process {}: {}", url, error);
                collected.failures.push(PageFailure {
                    url: url.to_string(),
                    error,
                });
            }
        }
        pb.inc(1);
    }

    info!(
        "Processed {} pages ({} failed)",
        urls.len(),
        collected.failures.len()
    );
    collected
}
