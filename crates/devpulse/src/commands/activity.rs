use super::{render, Context};
use devpulse_github::{GitHubError, Transport};
use devpulse_insights::{fetch_productivity_metrics, fetch_smart_suggestion, fetch_stats};
use devpulse_store::ConfigProvider;
use std::io::Write;

/// Render a family result; missing credentials shows the configuration hint
pub(crate) fn present<W: Write, V>(
    out: &mut W,
    result: Result<V, GitHubError>,
    show: impl FnOnce(&mut W, V) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    match result {
        Ok(value) => show(out, value)?,
        Err(GitHubError::MissingCredentials) => render::configuration_required(out)?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub async fn run_commits<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    let now = ctx.github.now();
    present(out, ctx.github.fetch_recent_commits(&service).await, |out, commits| {
        render::commits(out, &commits, now)
    })
}

pub async fn run_prs<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    let now = ctx.github.now();
    present(out, ctx.github.fetch_pull_requests(&service).await, |out, pulls| {
        render::pull_requests(out, &pulls, now)
    })
}

pub async fn run_stats<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    present(out, fetch_stats(&ctx.github, &service).await, |out, stats| {
        render::stats(out, &stats)
    })
}

pub async fn run_suggest<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    let result = fetch_smart_suggestion(&ctx.github, &service, &ctx.classifier).await;
    present(out, result, |out, suggestion| render::suggestion(out, &suggestion))
}

pub async fn run_productivity<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let service = ctx.store.load().github;
    present(out, fetch_productivity_metrics(&ctx.github, &service).await, |out, metrics| {
        render::productivity(out, &metrics)
    })
}
