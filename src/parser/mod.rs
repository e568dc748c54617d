pub mod heading;
pub mod node;
pub mod rewrite;
pub mod sections;

use scraper::Html;
use thiserror::Error;

use heading::KeywordMatcher;
use sections::{Section, SourcePage};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid page URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("keyword must not be empty")]
    EmptyKeyword,
}

/// Parse one page with html5ever's tolerant tree builder.
pub fn parse_page(html: &str) -> Html {
    node::parse_document(html)
}

/// Parse `html` once and run one extraction per matcher, in matcher order.
pub fn process_page(
    page_url: &str,
    html: &str,
    matchers: &[KeywordMatcher],
) -> Result<Vec<Vec<Section>>, ParseError> {
    let page = SourcePage::parse(page_url)?;
    let document = parse_page(html);
    Ok(matchers
        .iter()
        .map(|m| sections::extract_sections(&document, m, &page))
        .collect())
}
