use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use html5ever::serialize::{HtmlSerializer, SerializeOpts, Serializer};
use html5ever::{local_name, namespace_url, ns, QualName};
use tracing::info;

use crate::catalog::REPORT_STYLESHEETS;
use crate::parser::sections::Section;

/// Characters of `content_text` shown per section in the console listing.
const PREVIEW_CHARS: usize = 100;

const STYLE: &str = r#".section { margin-bottom: 40px; padding: 20px; border: 2px solid #dee2e6; border-radius: 8px; background-color: #fff; }
.section-header { background-color: #f8f9fa; padding: 15px; margin: -20px -20px 20px -20px; border-radius: 6px 6px 0 0; border-bottom: 2px solid #dee2e6; }
.section-title { margin: 0; color: #212529; font-size: 1.5em; }
.section-url { font-size: 0.9em; color: #6c757d; margin-top: 8px; }
.section-url a { color: #0d6efd; text-decoration: none; }
.section-url a:hover { text-decoration: underline; }
.masked {
  color: transparent;
  background-color: #fff57c;
  padding: 0.05em 0.5em;
  border: solid 2px #fff57c;
  cursor: pointer;
  user-select: none;
  -webkit-user-select: none;
  transition: all 0.3s ease;
}
.masked.open {
  color: inherit;
  background-color: transparent;
  border-color: transparent;
}
.masked:hover {
  opacity: 0.8;
}
"#;

// Click on a .masked span reveals it; a second click hides it again.
const SCRIPT: &str = r#"window.onload = function () {
  let maskedSpans = document.getElementsByClassName('masked');
  Array.from(maskedSpans).forEach((span) => {
    span.onclick = () => {
      span.classList.toggle('open');
    };
  });
};
"#;

/// Render a standalone HTML page listing `sections` under `title`.
/// Section bodies are inlined verbatim; everything else is escaped.
pub fn render_report(sections: &[Section], title: &str, generated_at: &str) -> String {
    let title = escaped(title);
    let mut out = String::with_capacity(4096 + sections.iter().map(|s| s.content_html.len()).sum::<usize>());

    out.push_str("<!DOCTYPE html>\n<html lang='ja'>\n<head>\n");
    out.push_str("<meta charset='UTF-8'>\n");
    out.push_str("<meta name='viewport' content='width=device-width, initial-scale=1.0'>\n");
    out.push_str(&format!("<!-- generated {} -->\n", generated_at));
    out.push_str(&format!("<title>{}</title>\n", title));
    for href in REPORT_STYLESHEETS {
        out.push_str(&format!("<link rel='stylesheet' href='{}'>\n", href));
    }
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str("<div class='container py-4'>\n");
    out.push_str(&format!("<h1 class='mb-4'>{}</h1>\n", title));

    for (i, section) in sections.iter().enumerate() {
        out.push_str("<div class='section'>\n");
        out.push_str("  <div class='section-header'>\n");
        out.push_str(&format!(
            "    <h2 class='section-title'>【{}】 {} (ID: {})</h2>\n",
            i + 1,
            escaped(&section.title),
            escaped(&section.id),
        ));
        out.push_str(&format!(
            "    <div class='section-url'>URL: {}</div>\n",
            source_link(&section.url),
        ));
        out.push_str("  </div>\n");
        out.push_str("  <div class='section-content'>\n");
        out.push_str(&section.content_html);
        out.push_str("\n  </div>\n");
        out.push_str("</div>\n\n");
    }

    out.push_str("</div>\n");
    out.push_str("<script>\n");
    out.push_str(SCRIPT);
    out.push_str("</script>\n</body>\n</html>");
    out
}

/// `text` escaped for use as element content.
fn escaped(text: &str) -> String {
    let mut bytes = Vec::new();
    let mut ser = HtmlSerializer::new(&mut bytes, SerializeOpts::default());
    // Writing into a Vec cannot fail.
    let _ = ser.write_text(text);
    String::from_utf8(bytes).unwrap_or_default()
}

/// `<a href="url">url</a>`, escaped by html5ever.
fn source_link(url: &str) -> String {
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_link(&mut bytes, url);
    String::from_utf8(bytes).unwrap_or_default()
}

fn write_link(out: &mut Vec<u8>, url: &str) -> io::Result<()> {
    let a = QualName::new(None, ns!(html), local_name!("a"));
    let href = QualName::new(None, ns!(), local_name!("href"));
    let mut ser = HtmlSerializer::new(out, SerializeOpts::default());
    ser.start_elem(a.clone(), std::iter::once((&href, url)))?;
    ser.write_text(url)?;
    ser.end_elem(a)
}

/// Write the report to `path`, replacing any existing file.
pub fn write_report(path: &Path, sections: &[Section], title: &str) -> Result<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html = render_report(sections, title, &generated_at);
    std::fs::write(path, html).with_context(|| format!("writing report {}", path.display()))?;
    info!("Wrote {} sections to {}", sections.len(), path.display());
    Ok(())
}

/// First `max` characters of `text`, then `...`.
pub fn preview(text: &str, max: usize) -> String {
    let head: String = text.chars().take(max).collect();
    format!("{}...", head)
}

/// Console listing of one category.
pub fn print_listing(label: &str, sections: &[Section]) {
    println!("\n【{}】", label);
    for (i, section) in sections.iter().enumerate() {
        println!("【{}】 {} (ID: {})", i + 1, section.title, section.id);
        println!("URL: {}", section.url);
        println!("内容:\n{}", preview(&section.content_text, PREVIEW_CHARS));
        println!("{}", "-".repeat(40));
    }
}
