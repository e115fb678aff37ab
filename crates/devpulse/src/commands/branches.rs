use super::{render, Context};
use devpulse_github::{fill_default_branches, GitHubError, Transport};
use devpulse_store::ConfigProvider;
use std::collections::BTreeMap;
use std::io::Write;

pub async fn run<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    set: &[(String, String)],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !set.is_empty() {
        ctx.store.update_service(|service| {
            let branches = service.branches.get_or_insert_with(BTreeMap::new);
            for (repo, branch) in set {
                branches.insert(repo.clone(), branch.clone());
            }
        });
    }

    let service = ctx.store.load().github;
    let repositories = service.selected_repositories();
    if repositories.is_empty() {
        writeln!(out, "No repositories selected")?;
        writeln!(out, "  devpulse repos select <owner/name>...")?;
        return Ok(());
    }

    let fetched = match ctx.github.list_branches(&service, repositories).await {
        Ok(fetched) => fetched,
        Err(GitHubError::MissingCredentials) => {
            render::configuration_required(out)?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut selection = service.branches.clone().unwrap_or_default();
    fill_default_branches(&mut selection, &fetched);
    if service.branches.as_ref() != Some(&selection) {
        let filled = selection.clone();
        ctx.store.update_service(move |s| s.branches = Some(filled));
    }

    for repo in repositories {
        writeln!(out, "{repo}")?;
        let Some(branches) = fetched.get(repo) else {
            writeln!(out, "    (branches unavailable)")?;
            continue;
        };
        let chosen = selection.get(repo);
        for branch in branches {
            let mark = if chosen == Some(branch) { "*" } else { " " };
            writeln!(out, "  {mark} {branch}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{configured, context, output};
    use serde_json::json;

    #[tokio::test]
    async fn test_fills_defaults_and_keeps_choices() {
        let ctx = context(configured(&["a/x", "a/y", "a/z"]));
        let t = ctx.github.transport();
        t.respond("/repos/a/x/branches", json!([{"name": "dev"}, {"name": "master"}]));
        t.respond("/repos/a/y/branches", json!([{"name": "main"}, {"name": "feature"}]));
        t.fail("/repos/a/z/branches", 500);

        let set = [("a/y".to_string(), "feature".to_string())];
        let mut buf = Vec::new();
        run(&ctx, &set, &mut buf).await.unwrap();
        let text = output(buf);

        let service = ctx.store.load().github;
        assert_eq!(service.branch_for("a/x"), Some("master"));
        assert_eq!(service.branch_for("a/y"), Some("feature"));
        assert_eq!(service.branch_for("a/z"), None);
        assert!(text.contains("  * master"));
        assert!(text.contains("  * feature"));
        assert!(text.contains("    main\n"));
        assert!(text.contains("(branches unavailable)"));
    }

    #[tokio::test]
    async fn test_no_selection() {
        let ctx = context(configured(&[]));
        let mut buf = Vec::new();
        run(&ctx, &[], &mut buf).await.unwrap();
        assert!(output(buf).starts_with("No repositories selected"));
        assert!(ctx.github.transport().requests().is_empty());
    }
}
