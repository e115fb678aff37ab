//! Keyword and language classifier behind the smart suggestions

use devpulse_github::LanguageShare;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Work category detected from commit messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Test,
    Doc,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Frontend,
        Category::Backend,
        Category::Test,
        Category::Doc,
    ];
}

/// Commits per category; one commit may count toward several
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTally {
    pub total: usize,
    pub hits: BTreeMap<Category, usize>,
}

impl KeywordTally {
    pub fn count(&self, category: Category) -> usize {
        self.hits.get(&category).copied().unwrap_or(0)
    }

    /// Hits over total commits (total floored at one)
    pub fn ratio(&self, category: Category) -> f64 {
        self.count(category) as f64 / self.total.max(1) as f64
    }
}

/// Summed distribution percentage of frontend and backend languages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LanguageSplit {
    pub frontend: f64,
    pub backend: f64,
}

/// Category keyword sets, frontend/backend language sets and issue search
/// terms, replaceable independently of the aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    keywords: BTreeMap<Category, Vec<String>>,
    frontend_languages: Vec<String>,
    backend_languages: Vec<String>,
    issue_terms: BTreeMap<String, Vec<String>>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Classifier {
    /// Classifier with no rules at all
    pub fn empty() -> Self {
        Self {
            keywords: BTreeMap::new(),
            frontend_languages: Vec::new(),
            backend_languages: Vec::new(),
            issue_terms: BTreeMap::new(),
        }
    }

    /// Replace the keyword set of `category`
    pub fn register(mut self, category: Category, keywords: &[&str]) -> Self {
        self.keywords.insert(
            category,
            keywords.iter().map(|k| k.to_lowercase()).collect(),
        );
        self
    }

    pub fn with_languages(mut self, frontend: &[&str], backend: &[&str]) -> Self {
        self.frontend_languages = owned(frontend);
        self.backend_languages = owned(backend);
        self
    }

    /// Issue search terms used when recommending `kind` (see `SuggestionKind::as_str`)
    pub fn with_issue_terms(mut self, kind: &str, terms: &[&str]) -> Self {
        self.issue_terms.insert(kind.to_string(), owned(terms));
        self
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.keywords.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn issue_terms(&self, kind: &str) -> &[String] {
        self.issue_terms.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories whose keywords occur in `message` (case-insensitive substring)
    pub fn categorize(&self, message: &str) -> Vec<Category> {
        let message = message.to_lowercase();
        Category::ALL
            .into_iter()
            .filter(|c| self.keywords(*c).iter().any(|k| message.contains(k.as_str())))
            .collect()
    }

    pub fn tally<'a>(&self, messages: impl IntoIterator<Item = &'a str>) -> KeywordTally {
        let mut tally = KeywordTally::default();
        for message in messages {
            tally.total += 1;
            for category in self.categorize(message) {
                *tally.hits.entry(category).or_default() += 1;
            }
        }
        tally
    }

    pub fn language_split(&self, distribution: &[LanguageShare]) -> LanguageSplit {
        let mut split = LanguageSplit::default();
        for share in distribution {
            if self.frontend_languages.contains(&share.language) {
                split.frontend += share.percentage;
            }
            if self.backend_languages.contains(&share.language) {
                split.backend += share.percentage;
            }
        }
        split
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::empty()
            .register(
                Category::Frontend,
                &["ui", "frontend", "component", "style", "css", "react", "vue", "angular"],
            )
            .register(
                Category::Backend,
                &["api", "backend", "server", "database", "endpoint", "service"],
            )
            .register(Category::Test, &["test", "spec", "unit", "integration"])
            .register(Category::Doc, &["doc", "readme", "comment", "documentation"])
            .with_languages(
                &["JavaScript", "TypeScript", "CSS", "HTML", "Vue", "React"],
                &["Python", "Java", "Go", "Rust", "C++", "C#", "PHP", "Ruby"],
            )
            .with_issue_terms(
                "frontend",
                &["ui", "frontend", "component", "style", "css", "react", "vue", "angular", "design"],
            )
            .with_issue_terms(
                "backend",
                &["api", "backend", "server", "database", "endpoint", "service", "performance"],
            )
            .with_issue_terms(
                "balanced",
                &["test", "testing", "documentation", "refactor", "cleanup", "improvement"],
            )
    }
}
