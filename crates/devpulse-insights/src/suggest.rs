//! Smart suggestions from commit-message keywords and the language mix

use crate::classifier::{Category, Classifier, KeywordTally, LanguageSplit};
use devpulse_github::{Auth, GitHub, GitHubError, SuggestedIssue, Transport};
use devpulse_store::ServiceConfig;
use serde::{Deserialize, Serialize};

/// Issues attached to a suggestion
const MAX_SUGGESTED_ISSUES: usize = 3;

const DOMINANT_RATIO: f64 = 0.7;
const DOMINANT_SHARE: f64 = 60.0;
const LOW_TEST_RATIO: f64 = 0.1;
const DOC_NUDGE_COMMITS: usize = 5;

const SELECT_REPOSITORIES: &str = "Select some repositories in settings to get personalized suggestions based on your coding patterns!";
const NO_RECENT_COMMITS: &str =
    "No recent commits found. Time to get coding! Check out these open issues to get started.";
const FRONTEND_HEAVY: &str = "You've been focusing heavily on frontend work lately. Consider balancing with some backend tasks or API development.";
const BACKEND_HEAVY: &str = "Lots of backend work recently! Time to polish the user experience with some frontend improvements.";
const LOW_TEST_COVERAGE: &str = "Your code coverage could use some attention. Consider adding tests to improve code reliability.";
const DOCUMENT_CHANGES: &str = "Great coding momentum! Consider documenting your recent changes to help future contributors.";
const BALANCED: &str =
    "Nice balanced development! Keep up the diverse contributions across different areas.";

/// Area of work the user is nudged toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Frontend,
    Backend,
    Balanced,
}

impl SuggestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Frontend => "frontend",
            SuggestionKind::Backend => "backend",
            SuggestionKind::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: String,
    pub issues: Vec<SuggestedIssue>,
}

/// Pick a suggestion for the observed keyword tally and language split.
/// First matching rule wins.
pub fn recommend(tally: &KeywordTally, split: &LanguageSplit) -> (SuggestionKind, &'static str) {
    if tally.total == 0 {
        return (SuggestionKind::Balanced, NO_RECENT_COMMITS);
    }
    if tally.ratio(Category::Frontend) > DOMINANT_RATIO || split.frontend > DOMINANT_SHARE {
        return (SuggestionKind::Backend, FRONTEND_HEAVY);
    }
    if tally.ratio(Category::Backend) > DOMINANT_RATIO || split.backend > DOMINANT_SHARE {
        return (SuggestionKind::Frontend, BACKEND_HEAVY);
    }
    if tally.ratio(Category::Test) < LOW_TEST_RATIO {
        return (SuggestionKind::Balanced, LOW_TEST_COVERAGE);
    }
    if tally.count(Category::Doc) == 0 && tally.total > DOC_NUDGE_COMMITS {
        return (SuggestionKind::Balanced, DOCUMENT_CHANGES);
    }
    (SuggestionKind::Balanced, BALANCED)
}

pub async fn fetch_smart_suggestion<T: Transport>(
    github: &GitHub<T>,
    service: &ServiceConfig,
    classifier: &Classifier,
) -> Result<SmartSuggestion, GitHubError> {
    Auth::require(&service.credentials)?;

    if service.selected_repositories().is_empty() {
        return Ok(SmartSuggestion {
            kind: SuggestionKind::Balanced,
            message: SELECT_REPOSITORIES.to_string(),
            issues: Vec::new(),
        });
    }

    let commits = github.fetch_recent_commits(service).await?;
    let (kind, message) = if commits.is_empty() {
        (SuggestionKind::Balanced, NO_RECENT_COMMITS)
    } else {
        let languages = github.fetch_language_distribution(service).await?;
        let tally = classifier.tally(commits.iter().map(|c| c.message.as_str()));
        let split = classifier.language_split(&languages);
        tracing::debug!(?tally, ?split, "classified recent work");
        recommend(&tally, &split)
    };

    let mut issues = github
        .fetch_suggested_issues(service, classifier.issue_terms(kind.as_str()))
        .await?;
    issues.truncate(MAX_SUGGESTED_ISSUES);

    Ok(SmartSuggestion {
        kind,
        message: message.to_string(),
        issues,
    })
}
