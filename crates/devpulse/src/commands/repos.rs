use super::{render, Context};
use devpulse_github::{GitHubError, Repository, Transport};
use devpulse_store::{ConfigProvider, ServiceConfig};
use std::io::Write;

/// Accessible repositories, or `None` after printing why they are unavailable
async fn listing<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    service: &ServiceConfig,
    out: &mut impl Write,
) -> anyhow::Result<Option<Vec<Repository>>> {
    match ctx.github.list_repositories(service).await {
        Ok(repositories) => Ok(Some(repositories)),
        Err(GitHubError::MissingCredentials) => {
            render::configuration_required(out)?;
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "repository listing failed");
            writeln!(out, "Failed to fetch repositories. Please check your credentials.")?;
            Ok(None)
        }
    }
}

fn filtered<'a>(repositories: &'a [Repository], search: Option<&str>) -> Vec<&'a Repository> {
    repositories
        .iter()
        .filter(|r| search.map_or(true, |term| r.matches(term)))
        .collect()
}

pub async fn run_list<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    search: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    let Some(repositories) = listing(ctx, &service, out).await? else {
        return Ok(());
    };

    let selected = service.selected_repositories();
    let shown = filtered(&repositories, search);

    if shown.is_empty() {
        let reason = if search.is_some() {
            "No repositories match your search"
        } else {
            "No repositories found"
        };
        writeln!(out, "{reason}")?;
        return Ok(());
    }

    for repo in shown {
        let mark = if selected.contains(&repo.full_name) { "x" } else { " " };
        let visibility = if repo.private { " (private)" } else { "" };
        writeln!(
            out,
            "[{mark}] {}{}  * {}",
            repo.full_name, visibility, repo.stargazers_count
        )?;
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(out, "    {description}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{} of {} repositories selected", selected.len(), repositories.len())?;
    Ok(())
}

pub fn run_select(
    store: &impl ConfigProvider,
    repositories: &[String],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    store.update_service(|service| {
        let selection = service.repositories.get_or_insert_with(Vec::new);
        for repo in repositories {
            if !selection.contains(repo) {
                selection.push(repo.clone());
            }
        }
    });
    let count = store.load().github.selected_repositories().len();
    writeln!(out, "{count} repositories selected")?;
    Ok(())
}

pub fn run_deselect(
    store: &impl ConfigProvider,
    repositories: &[String],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    store.update_service(|service| {
        if let Some(selection) = service.repositories.as_mut() {
            selection.retain(|r| !repositories.contains(r));
        }
        if let Some(branches) = service.branches.as_mut() {
            branches.retain(|r, _| !repositories.contains(r));
        }
    });
    let count = store.load().github.selected_repositories().len();
    writeln!(out, "{count} repositories selected")?;
    Ok(())
}

/// Select (or deselect) every accessible repository matching `search`
pub async fn run_select_all<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    search: Option<&str>,
    selecting: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    let Some(repositories) = listing(ctx, &service, out).await? else {
        return Ok(());
    };

    let names: Vec<String> = filtered(&repositories, search)
        .into_iter()
        .map(|r| r.full_name.clone())
        .collect();
    if names.is_empty() {
        writeln!(out, "No repositories match your search")?;
        return Ok(());
    }

    if selecting {
        run_select(&ctx.store, &names, out)
    } else {
        run_deselect(&ctx.store, &names, out)
    }
}

pub fn run_clear(store: &impl ConfigProvider, out: &mut impl Write) -> anyhow::Result<()> {
    store.update_service(|service| {
        service.repositories = Some(Vec::new());
        service.branches = None;
    });
    writeln!(out, "Repository selection cleared")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{configured, context, output};
    use devpulse_store::MemoryConfigProvider;
    use serde_json::json;

    fn repo(id: u64, full_name: &str, description: &str, updated_at: &str) -> serde_json::Value {
        let (owner, name) = full_name.split_once('/').unwrap();
        json!({
            "id": id,
            "name": name,
            "full_name": full_name,
            "description": description,
            "private": false,
            "owner": {"login": owner},
            "stargazers_count": 3,
            "updated_at": updated_at,
        })
    }

    #[tokio::test]
    async fn test_list_marks_selection_and_filters() {
        let ctx = context(configured(&["octocat/dashboard"]));
        let t = ctx.github.transport();
        t.respond(
            "/users/octocat/repos",
            json!([
                repo(1, "octocat/dashboard", "Activity widgets", "2026-10-01T00:00:00Z"),
                repo(2, "octocat/parser", "Toy DASHBOARD parser", "2026-09-01T00:00:00Z"),
                repo(3, "octocat/notes", "", "2026-08-01T00:00:00Z"),
            ]),
        );
        t.respond("/user/orgs", json!([]));

        let mut buf = Vec::new();
        run_list(&ctx, Some("dashboard"), &mut buf).await.unwrap();
        let text = output(buf);

        assert!(text.contains("[x] octocat/dashboard"));
        assert!(text.contains("[ ] octocat/parser"));
        assert!(!text.contains("octocat/notes"));
        assert!(text.contains("1 of 3 repositories selected"));
    }

    #[tokio::test]
    async fn test_list_failure_message() {
        let ctx = context(configured(&[]));
        let mut buf = Vec::new();
        run_list(&ctx, None, &mut buf).await.unwrap();
        assert_eq!(
            output(buf).trim(),
            "Failed to fetch repositories. Please check your credentials."
        );
    }

    #[tokio::test]
    async fn test_select_all_follows_search() {
        let ctx = context(configured(&["octocat/notes"]));
        let t = ctx.github.transport();
        t.respond(
            "/users/octocat/repos",
            json!([
                repo(1, "octocat/dashboard", "Activity widgets", "2026-10-01T00:00:00Z"),
                repo(2, "octocat/parser", "Toy DASHBOARD parser", "2026-09-01T00:00:00Z"),
                repo(3, "octocat/notes", "", "2026-08-01T00:00:00Z"),
            ]),
        );
        t.respond("/user/orgs", json!([]));

        let mut buf = Vec::new();
        run_select_all(&ctx, Some("dashboard"), true, &mut buf).await.unwrap();
        assert!(output(buf).contains("3 repositories selected"));
        assert_eq!(
            ctx.store.load().github.selected_repositories(),
            ["octocat/notes", "octocat/dashboard", "octocat/parser"]
        );

        run_select_all(&ctx, None, false, &mut Vec::new()).await.unwrap();
        assert!(ctx.store.load().github.selected_repositories().is_empty());

        let mut buf = Vec::new();
        run_select_all(&ctx, Some("nothing-like-this"), true, &mut buf).await.unwrap();
        assert!(output(buf).contains("No repositories match your search"));
    }

    #[test]
    fn test_select_deselect_clear() {
        let store = MemoryConfigProvider::new(configured(&["a/x"]));
        let repos = ["a/x".to_string(), "a/y".to_string()];

        run_select(&store, &repos, &mut Vec::new()).unwrap();
        assert_eq!(store.load().github.selected_repositories(), ["a/x", "a/y"]);

        store.update_service(|s| {
            s.branches = Some([("a/x".to_string(), "main".to_string())].into());
        });
        run_deselect(&store, &repos[..1], &mut Vec::new()).unwrap();
        let service = store.load().github;
        assert_eq!(service.selected_repositories(), ["a/y"]);
        assert_eq!(service.branch_for("a/x"), None);

        let mut buf = Vec::new();
        run_clear(&store, &mut buf).unwrap();
        assert!(store.load().github.selected_repositories().is_empty());
        assert!(output(buf).contains("cleared"));
    }
}
