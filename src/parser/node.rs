//! Tolerant parsing and detached copies of captured subtrees.
//!
//! A captured sibling is serialized and re-parsed into its own fragment
//! before any attribute is touched, so the source document stays intact and
//! can be scanned again for another keyword.

use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

// Scripting off on both sides: <noscript> content is markup, not raw text.
fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn parse_document(html: &str) -> Html {
    html5ever::parse_document(Html::new_document(), parse_opts()).one(html)
}

/// Parse `html` as the content of a `<body>`.
pub fn parse_fragment(html: &str) -> Html {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    html5ever::parse_fragment(Html::new_fragment(), parse_opts(), context, Vec::new()).one(html)
}

/// Serialize `element` with html5ever, as the non-scripting parser above reads it back.
pub fn serialize_node(element: ElementRef<'_>, traversal_scope: TraversalScope) -> String {
    let opts = SerializeOpts {
        scripting_enabled: false,
        traversal_scope,
        ..Default::default()
    };
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = html5ever::serialize(&mut bytes, &element, opts);
    String::from_utf8(bytes).unwrap_or_default()
}

/// An element copied out of a document into a tree of its own.
pub struct DetachedCopy {
    fragment: Html,
}

impl DetachedCopy {
    pub fn of(element: ElementRef<'_>) -> Self {
        Self {
            fragment: parse_fragment(&serialize_node(element, TraversalScope::IncludeNode)),
        }
    }

    /// Visit every element of the copy in document order.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        for node in self.fragment.tree.values_mut() {
            if let Node::Element(el) = node {
                f(el);
            }
        }
    }

    /// Markup of the copied element, serialized by html5ever.
    pub fn to_html(&self) -> String {
        // The fragment parser wraps its output in a synthetic <html> root.
        serialize_node(self.fragment.root_element(), TraversalScope::ChildrenOnly(None))
    }

    #[cfg(test)]
    pub fn fragment(&self) -> &Html {
        &self.fragment
    }
}

/// Rendered text: all descendant text joined, whitespace runs collapsed, trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn copy_serializes_like_the_source() {
        let doc = parse_fragment(r#"<div class="a"><p>one <b>two</b></p><!-- note --><img src="x.png"></div>"#);
        let el = first(&doc, "div");
        assert_eq!(DetachedCopy::of(el).to_html(), el.html());
    }

    #[test]
    fn noscript_text_round_trips_escaped() {
        let doc = parse_fragment("<div><noscript>a &lt; b</noscript></div>");
        let el = first(&doc, "div");
        assert_eq!(serialize_node(el, TraversalScope::IncludeNode), "<div><noscript>a &lt; b</noscript></div>");
        assert_eq!(DetachedCopy::of(el).to_html(), "<div><noscript>a &lt; b</noscript></div>");
    }

    #[test]
    fn editing_the_copy_leaves_the_source_alone() {
        let doc = parse_fragment(r#"<p><a href="x">x</a></p>"#);
        let el = first(&doc, "p");
        let mut copy = DetachedCopy::of(el);
        copy.for_each_element_mut(|e| {
            for (_, value) in e.attrs.iter_mut() {
                *value = "y".into();
            }
        });
        assert_eq!(copy.to_html(), r#"<p><a href="y">x</a></p>"#);
        assert_eq!(el.html(), r#"<p><a href="x">x</a></p>"#);
    }

    #[test]
    fn noscript_content_is_markup() {
        let doc = parse_document(r#"<body><noscript><img src="a.png"></noscript></body>"#);
        let img = first(&doc, "noscript > img");
        assert_eq!(img.value().attr("src"), Some("a.png"));
    }

    #[test]
    fn escaping_survives_the_copy() {
        let doc = parse_fragment(r#"<p title="say &quot;hi&quot; &amp; go">1 &lt; 2 &amp;&amp; 3 &gt; 2</p>"#);
        let el = first(&doc, "p");
        assert_eq!(
            DetachedCopy::of(el).to_html(),
            r#"<p title="say &quot;hi&quot; &amp; go">1 &lt; 2 &amp;&amp; 3 &gt; 2</p>"#
        );
    }

    #[test]
    fn text_collapses_whitespace() {
        let doc = parse_fragment("<ul>\n  <li> alpha </li>\n  <li>beta\n gamma</li>\n</ul>");
        assert_eq!(element_text(first(&doc, "ul")), "alpha beta gamma");
    }

    #[test]
    fn text_ignores_comments() {
        let doc = parse_fragment("<p>a<!-- hidden -->b</p>");
        assert_eq!(element_text(first(&doc, "p")), "ab");
    }
}
