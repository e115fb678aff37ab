//! Activity stats: commit and PR totals, day streak, language mix

use chrono::{Local, NaiveDate, TimeZone};
use devpulse_github::{
    GitHub, GitHubError, LanguageShare, PushEvent, Transport, ACTIVITY_WINDOW_DAYS,
};
use devpulse_store::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubStats {
    pub total_commits: usize,
    pub total_prs: u64,
    pub streak_days: u32,
    pub language_distribution: Vec<LanguageShare>,
}

/// Longest streak the activity window can show
pub const MAX_STREAK_DAYS: u32 = ACTIVITY_WINDOW_DAYS as u32;

/// Consecutive active days counted backwards from `today`, at most
/// [`MAX_STREAK_DAYS`]; zero when `today` itself had no activity
pub fn day_streak(active: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(d) = day.filter(|d| streak < MAX_STREAK_DAYS && active.contains(d)) {
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

/// Distinct calendar dates of the pushes in the timezone of `tz`
pub(crate) fn push_dates<Tz: TimeZone>(pushes: &[PushEvent], tz: &Tz) -> BTreeSet<NaiveDate> {
    pushes
        .iter()
        .map(|p| p.created_at.with_timezone(tz).date_naive())
        .collect()
}

pub async fn fetch_stats<T: Transport>(
    github: &GitHub<T>,
    service: &ServiceConfig,
) -> Result<GitHubStats, GitHubError> {
    let pushes = github.fetch_push_events(service).await?;
    let total_prs = github.fetch_pr_count(service).await?;
    let language_distribution = github.fetch_language_distribution(service).await?;

    let today = github.now().with_timezone(&Local).date_naive();
    let stats = GitHubStats {
        total_commits: pushes.iter().map(|p| p.commit_count).sum(),
        total_prs,
        streak_days: day_streak(&push_dates(&pushes, &Local), today),
        language_distribution,
    };
    tracing::debug!(
        commits = stats.total_commits,
        prs = stats.total_prs,
        streak = stats.streak_days,
        "stats aggregated"
    );
    Ok(stats)
}
