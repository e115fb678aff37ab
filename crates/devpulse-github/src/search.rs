//! Builder for `/search/issues` query strings

use chrono::NaiveDate;

/// Space-separated search qualifiers; spaces go out as `+` once form-encoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    parts: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn qualifier(mut self, key: &str, value: &str) -> Self {
        self.parts.push(format!("{}:{}", key, value));
        self
    }

    pub fn since(self, key: &str, date: NaiveDate) -> Self {
        let value = format!(">={}", date.format("%Y-%m-%d"));
        self.qualifier(key, &value)
    }

    pub fn repos(mut self, repositories: &[String]) -> Self {
        self.parts
            .extend(repositories.iter().map(|r| format!("repo:{}", r)));
        self
    }

    /// Parenthesized OR-group of quoted terms
    pub fn any_of(mut self, terms: &[String]) -> Self {
        if !terms.is_empty() {
            let group = terms
                .iter()
                .map(|t| format!("\"{}\"", t))
                .collect::<Vec<_>>()
                .join(" OR ");
            self.parts.push(format!("({})", group));
        }
        self
    }

    pub fn as_string(&self) -> String {
        self.parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pr_search_query() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 19).unwrap();
        let q = SearchQuery::new()
            .qualifier("involves", "octocat")
            .qualifier("type", "pr")
            .since("updated", date)
            .repos(&["a/x".to_string(), "a/y".to_string()]);
        assert_eq!(
            q.as_string(),
            "involves:octocat type:pr updated:>=2026-09-19 repo:a/x repo:a/y"
        );
    }

    #[test]
    fn test_or_group() {
        let q = SearchQuery::new()
            .qualifier("state", "open")
            .any_of(&["ui".to_string(), "css".to_string()]);
        assert_eq!(q.as_string(), "state:open (\"ui\" OR \"css\")");

        let q = SearchQuery::new().any_of(&[]);
        assert_eq!(q.as_string(), "");
    }
}
