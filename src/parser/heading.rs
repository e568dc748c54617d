use super::ParseError;

/// Rank of a sectioning heading element. Every tag outside `h1`..`h6` has no rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingRank {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingRank {
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    CaseSensitive,
    IgnoreCase,
}

/// Substring test applied to heading ids.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    mode: MatchMode,
}

impl KeywordMatcher {
    pub fn new(keyword: &str, mode: MatchMode) -> Result<Self, ParseError> {
        if keyword.is_empty() {
            return Err(ParseError::EmptyKeyword);
        }
        let keyword = match mode {
            MatchMode::CaseSensitive => keyword.to_string(),
            MatchMode::IgnoreCase => keyword.to_lowercase(),
        };
        Ok(Self { keyword, mode })
    }

    pub fn matches(&self, id: &str) -> bool {
        match self.mode {
            MatchMode::CaseSensitive => id.contains(&self.keyword),
            MatchMode::IgnoreCase => id.to_lowercase().contains(&self.keyword),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_cover_h1_to_h6_only() {
        let ranked: Vec<HeadingRank> = ["h1", "h2", "h3", "h4", "h5", "h6"]
            .iter()
            .filter_map(|t| HeadingRank::from_tag(t))
            .collect();
        assert_eq!(
            ranked,
            vec![
                HeadingRank::H1,
                HeadingRank::H2,
                HeadingRank::H3,
                HeadingRank::H4,
                HeadingRank::H5,
                HeadingRank::H6,
            ]
        );

        for tag in ["h0", "h7", "header", "hr", "p", "H3"] {
            assert_eq!(HeadingRank::from_tag(tag), None, "{tag}");
        }
    }

    #[test]
    fn case_sensitive_by_default() {
        let m = KeywordMatcher::new("sqlドリル", MatchMode::default()).unwrap();
        assert!(m.matches("sqlドリル-2"));
        assert!(!m.matches("SQLドリル-2"));
    }

    #[test]
    fn ignore_case_matches_either_casing() {
        let m = KeywordMatcher::new("SQLドリル", MatchMode::IgnoreCase).unwrap();
        assert!(m.matches("sqlドリル-2"));
        assert!(m.matches("SqlドリルX"));
        assert!(!m.matches("定着確認-1"));
    }

    #[test]
    fn empty_keyword_rejected() {
        assert!(matches!(
            KeywordMatcher::new("", MatchMode::CaseSensitive),
            Err(ParseError::EmptyKeyword)
        ));
    }
}
