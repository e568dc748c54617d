use url::Url;

use super::node::DetachedCopy;

/// Elements whose resource location gets resolved against the page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceKind {
    Image,
    Hyperlink,
    StylesheetLink,
    Script,
}

impl ReferenceKind {
    fn of(tag: &str) -> Option<Self> {
        match tag {
            "img" => Some(Self::Image),
            "a" => Some(Self::Hyperlink),
            "link" => Some(Self::StylesheetLink),
            "script" => Some(Self::Script),
            _ => None,
        }
    }

    fn location_attr(self) -> &'static str {
        match self {
            Self::Image | Self::Script => "src",
            Self::Hyperlink | Self::StylesheetLink => "href",
        }
    }
}

/// Rewrite every `img`/`script` `src` and `a`/`link` `href` in the copy to an
/// absolute URL joined onto `base`.
///
/// Only un-namespaced attributes count (`xlink:href` is left as written).
/// Empty values and values `Url::join` rejects are kept. Already-absolute
/// values come back unchanged, so a second pass is a no-op.
pub fn rewrite_references(copy: &mut DetachedCopy, base: &Url) {
    copy.for_each_element_mut(|el| {
        let Some(kind) = ReferenceKind::of(el.name()) else {
            return;
        };
        let attr = kind.location_attr();
        for (name, value) in el.attrs.iter_mut() {
            if !name.ns.is_empty() || &*name.local != attr || value.is_empty() {
                continue;
            }
            if let Ok(url) = base.join(value) {
                *value = url.as_str().into();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::node::parse_fragment;
    use scraper::{ElementRef, Selector};

    const BASE: &str = "https://example.org/course/lecture01.html";

    fn rewritten(html: &str, css: &str) -> DetachedCopy {
        let doc = parse_fragment(html);
        let sel = Selector::parse(css).unwrap();
        let mut copy = DetachedCopy::of(doc.select(&sel).next().unwrap());
        rewrite_references(&mut copy, &Url::parse(BASE).unwrap());
        copy
    }

    fn locations(copy: &DetachedCopy) -> Vec<String> {
        let sel = Selector::parse("[src], [href]").unwrap();
        copy.fragment()
            .select(&sel)
            .flat_map(|e: ElementRef<'_>| {
                ["src", "href"]
                    .into_iter()
                    .filter_map(move |a| e.value().attr(a).map(str::to_string))
            })
            .collect()
    }

    #[test]
    fn resolves_all_reference_kinds_at_any_depth() {
        let copy = rewritten(
            r#"<div>
                <img src="img/a.png">
                <p><a href="../other.html#q1">link</a></p>
                <section><link rel="stylesheet" href="/site.css"><script src="js/app.js"></script></section>
            </div>"#,
            "div",
        );
        assert_eq!(
            locations(&copy),
            vec![
                "https://example.org/course/img/a.png",
                "https://example.org/other.html#q1",
                "https://example.org/site.css",
                "https://example.org/course/js/app.js",
            ]
        );
    }

    #[test]
    fn scheme_relative_and_absolute_values() {
        let copy = rewritten(
            r#"<div><img src="//cdn.example.net/x.png"><a href="https://other.org/page">x</a></div>"#,
            "div",
        );
        assert_eq!(
            locations(&copy),
            vec!["https://cdn.example.net/x.png", "https://other.org/page"]
        );
    }

    #[test]
    fn ignores_other_elements_and_empty_values() {
        let html = r#"<div><a>anchor</a><img src=""><iframe src="embed.html"></iframe></div>"#;
        let copy = rewritten(html, "div");
        assert_eq!(copy.to_html(), html);
    }

    #[test]
    fn namespaced_href_is_untouched() {
        let copy = rewritten(
            r##"<div><svg><use xlink:href="#icon"></use></svg><a href="p.html">p</a></div>"##,
            "div",
        );
        let html = copy.to_html();
        assert!(html.contains(r##"xlink:href="#icon""##), "{html}");
        assert!(html.contains(r#"href="https://example.org/course/p.html""#), "{html}");
    }

    #[test]
    fn rewriting_is_idempotent() {
        let base = Url::parse(BASE).unwrap();
        let mut copy = rewritten(
            r#"<div><img src="x.png"><a href="?page=2">n</a><script src="a.js"></script></div>"#,
            "div",
        );
        let once = copy.to_html();
        rewrite_references(&mut copy, &base);
        assert_eq!(copy.to_html(), once);
    }

    #[test]
    fn root_element_itself_is_rewritten() {
        let copy = rewritten(r#"<a href="next.html">next</a>"#, "a");
        assert_eq!(
            copy.to_html(),
            r#"<a href="https://example.org/course/next.html">next</a>"#
        );
    }
}
