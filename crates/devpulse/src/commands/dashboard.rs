//! Full dashboard: all five query families, optionally refreshed on a timer

use super::{render, Context};
use devpulse_github::{Commit, GitHubError, PullRequest, Transport};
use devpulse_insights::{
    fetch_productivity_metrics, fetch_smart_suggestion, fetch_stats, GitHubStats,
    ProductivityMetrics, SmartSuggestion,
};
use devpulse_store::{ConfigProvider, DashboardConfig, Generations, QueryFamily};
use std::future::Future;
use std::io::Write;
use std::time::Duration;

type Family<V> = Option<Result<V, GitHubError>>;

/// Results of one refresh; `None` marks a family whose result went stale
#[derive(Debug, Default)]
pub struct Snapshot {
    pub commits: Family<Vec<Commit>>,
    pub pull_requests: Family<Vec<PullRequest>>,
    pub stats: Family<GitHubStats>,
    pub suggestion: Family<SmartSuggestion>,
    pub productivity: Family<ProductivityMetrics>,
}

impl Snapshot {
    pub fn is_stale(&self) -> bool {
        self.commits.is_none()
            && self.pull_requests.is_none()
            && self.stats.is_none()
            && self.suggestion.is_none()
            && self.productivity.is_none()
    }
}

/// Run every family concurrently. Tickets are taken when this is called,
/// so a bump before the returned future completes drops that family.
pub fn refresh<'a, P: ConfigProvider, T: Transport>(
    ctx: &'a Context<P, T>,
    config: &'a DashboardConfig,
    generations: &Generations,
) -> impl Future<Output = Snapshot> + 'a {
    let commits = generations.begin(QueryFamily::Commits);
    let pull_requests = generations.begin(QueryFamily::PullRequests);
    let stats = generations.begin(QueryFamily::Stats);
    let suggestion = generations.begin(QueryFamily::Suggestions);
    let productivity = generations.begin(QueryFamily::Productivity);

    async move {
        let service = &config.github;
        let (c, p, s, g, m) = tokio::join!(
            ctx.github.fetch_recent_commits(service),
            ctx.github.fetch_pull_requests(service),
            fetch_stats(&ctx.github, service),
            fetch_smart_suggestion(&ctx.github, service, &ctx.classifier),
            fetch_productivity_metrics(&ctx.github, service),
        );

        Snapshot {
            commits: commits.accept(c),
            pull_requests: pull_requests.accept(p),
            stats: stats.accept(s),
            suggestion: suggestion.accept(g),
            productivity: productivity.accept(m),
        }
    }
}

/// Refresh while polling the store every `poll`; a settings change bumps
/// every generation and is returned alongside the (now stale) snapshot
async fn refresh_watching<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    config: &DashboardConfig,
    generations: &Generations,
    poll: Duration,
) -> (Snapshot, Option<DashboardConfig>) {
    let fetch = refresh(ctx, config, generations);
    tokio::pin!(fetch);

    let mut changed = None;
    loop {
        tokio::select! {
            snapshot = &mut fetch => return (snapshot, changed),
            _ = tokio::time::sleep(poll), if changed.is_none() => {
                let latest = ctx.store.load();
                if latest != *config {
                    tracing::info!("settings changed during refresh");
                    generations.bump_all();
                    changed = Some(latest);
                }
            }
        }
    }
}

fn show<W: Write, V>(
    out: &mut W,
    family: Family<V>,
    render: impl FnOnce(&mut W, V) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    match family {
        Some(Ok(value)) => render(out, value)?,
        Some(Err(e)) => writeln!(out, "  unavailable: {e}")?,
        None => writeln!(out, "  (refreshing)")?,
    }
    writeln!(out)?;
    Ok(())
}

pub fn render_snapshot(
    out: &mut impl Write,
    username: &str,
    snapshot: Snapshot,
    now: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<()> {
    render::header(out, username)?;
    show(out, snapshot.stats, |out, stats| render::stats(out, &stats))?;
    show(out, snapshot.pull_requests, |out, pulls| {
        render::pull_requests(out, &pulls, now)
    })?;
    show(out, snapshot.commits, |out, commits| render::commits(out, &commits, now))?;
    show(out, snapshot.suggestion, |out, s| render::suggestion(out, &s))?;
    show(out, snapshot.productivity, |out, m| render::productivity(out, &m))?;
    render::updated_at(out, now)?;
    Ok(())
}

pub async fn run<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    watch: Option<Duration>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let generations = Generations::new();
    let mut config = ctx.store.load();

    loop {
        let service = &config.github;
        if !service.enabled {
            render::welcome(out)?;
        } else if !service.credentials.is_complete() {
            render::configuration_required(out)?;
        } else {
            let (snapshot, changed) = match watch {
                Some(poll) => refresh_watching(ctx, &config, &generations, poll).await,
                None => (refresh(ctx, &config, &generations).await, None),
            };
            if let Some(latest) = changed {
                config = latest;
                if snapshot.is_stale() {
                    continue;
                }
            }
            let username = config.github.credentials.username().unwrap_or_default();
            render_snapshot(out, username, snapshot, ctx.github.now())?;
        }
        out.flush()?;

        let Some(interval) = watch else {
            return Ok(());
        };
        tokio::time::sleep(interval).await;

        let latest = ctx.store.load();
        if latest != config {
            tracing::info!("settings changed");
            generations.bump_all();
            config = latest;
        }
    }
}
