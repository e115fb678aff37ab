use chrono::{DateTime, Duration, SecondsFormat, Utc};
use devpulse_github::{GitHub, GitHubError, MockTransport, Throttle};
use devpulse_insights::{
    fetch_productivity_metrics, fetch_smart_suggestion, fetch_stats, Classifier, SuggestionKind,
};
use devpulse_store::{Credentials, ServiceConfig};
use serde_json::{json, Value};

fn now() -> DateTime<Utc> {
    "2026-10-19T12:00:00Z".parse().unwrap()
}

fn ago(hours: i64) -> String {
    (now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn client() -> GitHub<MockTransport> {
    GitHub::new(MockTransport::new())
        .with_throttle(Throttle::none())
        .with_clock(now())
}

fn service(repos: &[&str]) -> ServiceConfig {
    ServiceConfig {
        enabled: true,
        credentials: Credentials::new("ghp_test", "octocat"),
        repositories: (!repos.is_empty()).then(|| repos.iter().map(|r| r.to_string()).collect()),
        branches: None,
    }
}

fn push(repo: &str, created_at: &str, commits: usize) -> Value {
    let commits: Vec<Value> = (0..commits)
        .map(|i| json!({"sha": format!("{}-{}-{}", repo, created_at, i), "message": "work"}))
        .collect();
    json!({
        "type": "PushEvent",
        "created_at": created_at,
        "repo": {"name": repo},
        "payload": {"commits": commits}
    })
}

fn commit(sha: &str, date: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/a/x/commit/{}", sha),
        "author": {"login": "octocat"},
        "commit": {"message": message, "author": {"name": "Octo Cat", "date": date}}
    })
}

fn issue(number: u64) -> Value {
    json!({
        "number": number,
        "title": format!("Issue {}", number),
        "state": "open",
        "html_url": format!("https://github.com/a/x/issues/{}", number),
        "created_at": ago(48),
        "updated_at": ago(2),
    })
}

#[tokio::test]
async fn test_stats_combine_sources() {
    let github = client();
    let t = github.transport();
    t.respond(
        "/users/octocat/events",
        json!([
            push("a/x", &ago(0), 2),
            push("a/z", &ago(0), 5),
            push("a/x", &ago(24), 1),
        ]),
    );
    t.respond_matching(
        "/search/issues",
        "author:octocat",
        json!({"total_count": 4, "items": []}),
    );
    t.respond("/repos/a/x/languages", json!({"Rust": 900, "Shell": 100}));

    let stats = fetch_stats(&github, &service(&["a/x"])).await.unwrap();

    // Pushes count across every repository, not just the selection
    assert_eq!(stats.total_commits, 8);
    assert_eq!(stats.total_prs, 4);
    assert_eq!(stats.streak_days, 2);
    assert_eq!(stats.language_distribution.len(), 2);
    assert_eq!(stats.language_distribution[0].language, "Rust");
}

#[tokio::test]
async fn test_stats_streak_bounded_by_window() {
    let github = client();
    let daily: Vec<Value> = (0..10).map(|day| push("a/x", &ago(24 * day), 1)).collect();
    github
        .transport()
        .respond("/users/octocat/events", Value::Array(daily));

    let stats = fetch_stats(&github, &service(&[])).await.unwrap();

    assert_eq!(stats.streak_days, 7);
    // Rolling seven days from now includes the push exactly 168h ago
    assert_eq!(stats.total_commits, 8);
}

#[tokio::test]
async fn test_stats_degrade_to_zero() {
    let github = client();
    let stats = fetch_stats(&github, &service(&["a/x"])).await.unwrap();

    assert_eq!(stats.total_commits, 0);
    assert_eq!(stats.total_prs, 0);
    assert_eq!(stats.streak_days, 0);
    assert!(stats.language_distribution.is_empty());
}

#[tokio::test]
async fn test_missing_credentials_block_every_family() {
    let github = client();
    let svc = ServiceConfig {
        credentials: Credentials::new("ghp_test", ""),
        repositories: Some(vec!["a/x".to_string()]),
        ..Default::default()
    };

    assert!(matches!(
        fetch_stats(&github, &svc).await,
        Err(GitHubError::MissingCredentials)
    ));
    assert!(fetch_smart_suggestion(&github, &svc, &Classifier::default())
        .await
        .is_err());
    assert!(fetch_productivity_metrics(&github, &svc).await.is_err());
    assert!(github.transport().requests().is_empty());
}

#[tokio::test]
async fn test_suggestion_without_selection_asks_for_repositories() {
    let github = client();
    let suggestion = fetch_smart_suggestion(&github, &service(&[]), &Classifier::default())
        .await
        .unwrap();

    assert_eq!(suggestion.kind, SuggestionKind::Balanced);
    assert!(suggestion.message.starts_with("Select some repositories"));
    assert!(suggestion.issues.is_empty());
    assert!(github.transport().requests().is_empty());
}

#[tokio::test]
async fn test_frontend_heavy_work_suggests_backend_issues() {
    let github = client();
    let t = github.transport();
    let mut commits: Vec<Value> = (0..8)
        .map(|i| commit(&format!("f{}", i), &ago(i + 1), "polish ui component"))
        .collect();
    commits.push(commit("t0", &ago(10), "add test for parser"));
    commits.push(commit("t1", &ago(11), "bump deps"));
    t.respond("/repos/a/x/commits", Value::Array(commits));
    t.respond("/repos/a/x/languages", json!({"TypeScript": 800, "Rust": 200}));
    t.respond(
        "/search/issues",
        json!({"total_count": 5, "items": [issue(1), issue(2), issue(3), issue(4), issue(5)]}),
    );

    let suggestion = fetch_smart_suggestion(&github, &service(&["a/x"]), &Classifier::default())
        .await
        .unwrap();

    assert_eq!(suggestion.kind, SuggestionKind::Backend);
    assert!(suggestion.message.contains("focusing heavily on frontend"));
    assert_eq!(suggestion.issues.len(), 3);
    assert_eq!(suggestion.issues[0].repository, "a/x");

    let search = t
        .decoded_requests()
        .into_iter()
        .find(|r| r.starts_with("/search/issues"))
        .unwrap();
    assert!(search.contains("\"performance\""));
    assert!(search.contains("repo:a/x state:open type:issue"));
}

#[tokio::test]
async fn test_no_commits_suggests_balanced_issues() {
    let github = client();
    let t = github.transport();
    t.respond("/search/issues", json!({"total_count": 1, "items": [issue(9)]}));

    let suggestion = fetch_smart_suggestion(&github, &service(&["a/x"]), &Classifier::default())
        .await
        .unwrap();

    assert_eq!(suggestion.kind, SuggestionKind::Balanced);
    assert!(suggestion.message.starts_with("No recent commits"));
    assert_eq!(suggestion.issues.len(), 1);
    assert!(t
        .decoded_requests()
        .iter()
        .any(|r| r.contains("\"refactor\"")));
}

#[tokio::test]
async fn test_custom_classifier_changes_recommendation() {
    let github = client();
    let t = github.transport();
    t.respond(
        "/repos/a/x/commits",
        json!([commit("c1", &ago(1), "tune query planner"), commit("c2", &ago(2), "tune query cache")]),
    );

    let classifier = Classifier::default().register(devpulse_insights::Category::Backend, &["query"]);
    let suggestion = fetch_smart_suggestion(&github, &service(&["a/x"]), &classifier)
        .await
        .unwrap();

    assert_eq!(suggestion.kind, SuggestionKind::Frontend);
}

#[tokio::test]
async fn test_productivity_from_commit_timestamps() {
    let github = client();
    let t = github.transport();
    t.respond(
        "/repos/a/x/commits",
        json!([commit("c1", &ago(1), "work"), commit("c2", &ago(2), "work")]),
    );
    t.respond("/repos/a/x/languages", json!({"Rust": 1000}));

    let metrics = fetch_productivity_metrics(&github, &service(&["a/x"]))
        .await
        .unwrap();

    let total: usize = metrics.coding_velocity.daily.iter().map(|d| d.commits).sum();
    assert_eq!(metrics.coding_velocity.daily.len(), 7);
    assert_eq!(total, 2);
    assert!(metrics.peak_hours.most_productive_hour.is_some());
    assert!((metrics.focus_metrics.total_focus_time - 1.0).abs() < 1e-9);
    assert_eq!(metrics.focus_metrics.interruption_rate, 0.0);
    assert_eq!(metrics.language_proficiency.len(), 1);
    assert_eq!(metrics.language_proficiency[0].language, "Rust");
    assert_eq!(metrics.language_proficiency[0].recent_activity, 2);
}
