use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

use super::heading::{HeadingRank, KeywordMatcher};
use super::node::{element_text, DetachedCopy};
use super::rewrite::rewrite_references;
use super::ParseError;

static WITH_ID: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[id]").unwrap());

/// Headings of this rank open a section when their id matches.
const MARKER_RANK: HeadingRank = HeadingRank::H3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content_html: String,
    pub content_text: String,
    pub url: String,
}

/// Where a document came from: the URL as given, and its parsed form for joins.
#[derive(Debug, Clone)]
pub struct SourcePage<'a> {
    pub url: &'a str,
    pub base: Url,
}

impl<'a> SourcePage<'a> {
    pub fn parse(url: &'a str) -> Result<Self, ParseError> {
        let base = Url::parse(url).map_err(|source| ParseError::InvalidBaseUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self { url, base })
    }
}

/// Find every matching `h3` in document order and capture the element
/// siblings that follow it up to (not including) the next `h1`..`h6`.
pub fn extract_sections(document: &Html, matcher: &KeywordMatcher, page: &SourcePage<'_>) -> Vec<Section> {
    document
        .select(&WITH_ID)
        .filter(|el| HeadingRank::from_tag(el.value().name()) == Some(MARKER_RANK))
        .filter_map(|el| el.value().attr("id").map(|id| (el, id)))
        .filter(|(_, id)| matcher.matches(id))
        .map(|(heading, id)| capture(heading, id, page))
        .collect()
}

fn capture(heading: ElementRef<'_>, id: &str, page: &SourcePage<'_>) -> Section {
    let mut html_parts = Vec::new();
    let mut text_parts = Vec::new();

    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        if HeadingRank::from_tag(sibling.value().name()).is_some() {
            break;
        }

        let mut copy = DetachedCopy::of(sibling);
        rewrite_references(&mut copy, &page.base);
        html_parts.push(copy.to_html());

        let text = element_text(sibling);
        if !text.is_empty() {
            text_parts.push(text);
        }
    }

    Section {
        id: id.to_string(),
        title: element_text(heading),
        content_html: html_parts.join("\n"),
        content_text: text_parts.join("\n"),
        url: page.url.to_string(),
    }
}

// ── Tests ──
