use chrono::{DateTime, Duration, SecondsFormat, Utc};
use devpulse_github::{GitHub, MockTransport, Throttle};
use devpulse_store::{Credentials, ServiceConfig};
use serde_json::{json, Value};

pub fn service(repos: &[&str]) -> ServiceConfig {
    ServiceConfig {
        enabled: true,
        credentials: Credentials::new("ghp_test", "octocat"),
        repositories: if repos.is_empty() {
            None
        } else {
            Some(repos.iter().map(|r| r.to_string()).collect())
        },
        branches: None,
    }
}

pub fn client(now: DateTime<Utc>) -> GitHub<MockTransport> {
    GitHub::new(MockTransport::new())
        .with_throttle(Throttle::none())
        .with_clock(now)
}

pub fn ago(now: DateTime<Utc>, hours: i64) -> String {
    (now - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn push_event(repo: &str, created_at: &str, shas: &[&str]) -> Value {
    let commits: Vec<Value> = shas
        .iter()
        .map(|sha| json!({"sha": sha, "message": format!("work {}", sha), "author": {"name": "Octo Cat", "email": "octocat@example.com"}}))
        .collect();
    json!({
        "type": "PushEvent",
        "created_at": created_at,
        "repo": {"name": repo},
        "payload": {"commits": commits}
    })
}

pub fn repo_commit(sha: &str, login: &str, date: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/a/y/commit/{}", sha),
        "author": {"login": login},
        "commit": {
            "message": message,
            "author": {"name": "Octo Cat", "email": "octo@example.com", "date": date}
        }
    })
}

pub fn search_item(repo: &str, number: u64, state: &str, created_at: &str, merged: bool) -> Value {
    json!({
        "number": number,
        "title": format!("PR {}", number),
        "state": state,
        "html_url": format!("https://github.com/{}/pull/{}", repo, number),
        "repository_url": format!("https://api.github.com/repos/{}", repo),
        "created_at": created_at,
        "updated_at": created_at,
        "comments": 2,
        "user": {"login": "octocat"},
        "pull_request": {"merged_at": if merged { json!(created_at) } else { Value::Null }}
    })
}
