use std::sync::LazyLock;

use regex::Regex;

use crate::parser::heading::{KeywordMatcher, MatchMode};
use crate::parser::ParseError;

static LECTURE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"lecture(\d+)").unwrap());

/// Lecture pages scanned on every run, in output order.
pub const LECTURE_URLS: &[&str] = &[
    "https://takeshiwada1980.github.io/DB-2025/lecture01.html",
    "https://takeshiwada1980.github.io/DB-2025/lecture02.html",
    "https://takeshiwada1980.github.io/DB-2025/lecture03.html",
    "https://takeshiwada1980.github.io/DB-2025/lecture04.html",
    "https://takeshiwada1980.github.io/DB-2025/lecture05.html",
    "https://takeshiwada1980.github.io/DB-2025/lecture06.html",
    "https://takeshiwada1980.github.io/DB-2025/lecture07.html",
];

/// Stylesheets linked from every generated report.
pub const REPORT_STYLESHEETS: &[&str] = &[
    "https://takeshiwada1980.github.io/DB-2025/site_libs/bootstrap/bootstrap.min.css",
    "https://takeshiwada1980.github.io/DB-2025/site_libs/bootstrap/bootstrap-icons.css",
];

/// One independent extraction pass over every page.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    /// Short name used in console output.
    pub label: &'static str,
    /// Substring searched for in `h3` ids, cased as the site generates them.
    pub keyword: &'static str,
    pub output_file: &'static str,
    pub report_title: &'static str,
}

impl Category {
    pub fn matcher(&self, mode: MatchMode) -> Result<KeywordMatcher, ParseError> {
        KeywordMatcher::new(self.keyword, mode)
    }
}

pub const COMPREHENSION_CHECK: Category = Category {
    label: "定着確認",
    keyword: "定着確認",
    output_file: "teichaku_sections.html",
    report_title: "定着確認問題一覧",
};

// The site lowercases "SQL" when it generates heading ids.
pub const SQL_DRILL: Category = Category {
    label: "SQLドリル",
    keyword: "sqlドリル",
    output_file: "sql_drill_sections.html",
    report_title: "SQLドリル問題一覧",
};

pub const CATEGORIES: &[Category] = &[COMPREHENSION_CHECK, SQL_DRILL];

/// Human label for a lecture page: `第NN回` when the URL names a lecture number.
pub fn lecture_label(url: &str) -> String {
    match LECTURE_RE.captures(url) {
        Some(caps) => format!("第{}回", &caps[1]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_lecture_number() {
        assert_eq!(lecture_label(LECTURE_URLS[2]), "第03回");
    }

    #[test]
    fn label_falls_back_to_url() {
        assert_eq!(lecture_label("https://example.org/intro.html"), "https://example.org/intro.html");
    }

    #[test]
    fn categories_keep_site_casing() {
        assert_eq!(CATEGORIES.len(), 2);
        assert_eq!(SQL_DRILL.keyword, "sqlドリル");
        assert_ne!(COMPREHENSION_CHECK.output_file, SQL_DRILL.output_file);
    }
}
