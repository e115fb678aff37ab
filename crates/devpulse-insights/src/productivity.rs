//! Productivity metrics derived from commit timestamps
//!
//! Everything here is computed in the timezone of the `now` handed to
//! [`derive_productivity`], so the dashboard shows local days and hours
//! while tests pin a fixed offset.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Timelike, Utc};
use devpulse_github::{
    language_distribution, Commit, GitHub, GitHubError, RepositoryLanguages, Transport,
    ACTIVITY_WINDOW_DAYS,
};
use devpulse_store::ServiceConfig;
use serde::{Deserialize, Serialize};

/// Relative change that still counts as stable
const TREND_BAND: f64 = 0.2;
/// Longest quiet gap inside one coding session
const SESSION_GAP_HOURS: i64 = 2;
/// Shortest credited session
const MIN_SESSION_MINUTES: i64 = 15;
const FOCUS_INTENSITY: u32 = 50;
const TOP_LANGUAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    fn between(earlier: usize, later: usize) -> Self {
        let (earlier, later) = (earlier as f64, later as f64);
        if later > earlier * (1.0 + TREND_BAND) {
            Trend::Increasing
        } else if later < earlier * (1.0 - TREND_BAND) {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVelocity {
    pub date: NaiveDate,
    pub commits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingVelocity {
    pub daily: Vec<DailyVelocity>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyActivity {
    pub hour: u32,
    pub commits: usize,
    /// Percentage of the busiest hour
    pub intensity: u32,
}

/// Run of busy hours, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusBlock {
    pub start: u32,
    pub end: u32,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHours {
    pub hourly_activity: Vec<HourlyActivity>,
    pub most_productive_hour: Option<u32>,
    pub focus_time_blocks: Vec<FocusBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageProficiency {
    pub language: String,
    pub proficiency_score: f64,
    pub recent_activity: usize,
    pub trend: Trend,
}

/// Session statistics in hours
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusMetrics {
    pub average_session_length: f64,
    pub longest_session: f64,
    pub total_focus_time: f64,
    /// Session breaks per focus hour
    pub interruption_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityMetrics {
    pub coding_velocity: CodingVelocity,
    pub peak_hours: PeakHours,
    pub language_proficiency: Vec<LanguageProficiency>,
    pub focus_metrics: FocusMetrics,
}

/// Commits clustered by time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Session {
    /// Span in hours, floored at the minimum session length
    pub fn hours(&self) -> f64 {
        let span = (self.end - self.start).max(Duration::minutes(MIN_SESSION_MINUTES));
        span.num_seconds() as f64 / 3600.0
    }
}

/// Cluster timestamps into sessions; a gap above two hours starts a new one
pub fn sessions(timestamps: impl IntoIterator<Item = DateTime<Utc>>) -> Vec<Session> {
    let mut sorted: Vec<_> = timestamps.into_iter().collect();
    sorted.sort();

    let mut out: Vec<Session> = Vec::new();
    for at in sorted {
        match out.last_mut() {
            Some(current) if at - current.end <= Duration::hours(SESSION_GAP_HOURS) => {
                current.end = at;
            }
            _ => out.push(Session { start: at, end: at }),
        }
    }
    out
}

fn focus_metrics(sessions: &[Session]) -> FocusMetrics {
    if sessions.is_empty() {
        return FocusMetrics::default();
    }
    let lengths: Vec<f64> = sessions.iter().map(Session::hours).collect();
    let total: f64 = lengths.iter().sum();
    FocusMetrics {
        average_session_length: total / lengths.len() as f64,
        longest_session: lengths.iter().copied().fold(0.0, f64::max),
        total_focus_time: total,
        interruption_rate: (sessions.len() - 1) as f64 / total,
    }
}

fn coding_velocity<Tz: TimeZone>(commits: &[Commit], now: &DateTime<Tz>) -> CodingVelocity {
    let tz = now.timezone();
    let today = now.date_naive();
    let daily: Vec<DailyVelocity> = (0..ACTIVITY_WINDOW_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let commits = commits
                .iter()
                .filter(|c| c.date.with_timezone(&tz).date_naive() == date)
                .count();
            DailyVelocity { date, commits }
        })
        .collect();

    let half = daily.len() / 2;
    let earlier: usize = daily[..half].iter().map(|d| d.commits).sum();
    let later: usize = daily[daily.len() - half..].iter().map(|d| d.commits).sum();
    CodingVelocity {
        daily,
        trend: Trend::between(earlier, later),
    }
}

fn focus_blocks(hourly: &[HourlyActivity]) -> Vec<FocusBlock> {
    let block = |start: u32, end: u32| FocusBlock {
        start,
        end,
        duration: end - start,
    };

    let mut blocks = Vec::new();
    let mut open: Option<u32> = None;
    for slot in hourly {
        match (slot.intensity >= FOCUS_INTENSITY, open) {
            (true, None) => open = Some(slot.hour),
            (false, Some(start)) => {
                blocks.push(block(start, slot.hour));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        blocks.push(block(start, 24));
    }
    blocks
}

fn peak_hours<Tz: TimeZone>(commits: &[Commit], tz: &Tz) -> PeakHours {
    let mut counts = [0usize; 24];
    for commit in commits {
        counts[commit.date.with_timezone(tz).hour() as usize] += 1;
    }
    let max = counts.iter().copied().max().unwrap_or(0);

    let hourly_activity: Vec<HourlyActivity> = counts
        .iter()
        .enumerate()
        .map(|(hour, &commits)| HourlyActivity {
            hour: hour as u32,
            commits,
            intensity: if max == 0 { 0 } else { (commits * 100 / max) as u32 },
        })
        .collect();

    PeakHours {
        most_productive_hour: (max > 0)
            .then(|| counts.iter().position(|&c| c == max))
            .flatten()
            .map(|h| h as u32),
        focus_time_blocks: focus_blocks(&hourly_activity),
        hourly_activity,
    }
}

fn language_proficiency(
    commits: &[Commit],
    repos: &[RepositoryLanguages],
    midpoint: DateTime<Utc>,
) -> Vec<LanguageProficiency> {
    language_distribution(repos)
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|share| {
            let using: Vec<&str> = repos
                .iter()
                .filter(|r| r.languages.contains_key(&share.language))
                .map(|r| r.repository.as_str())
                .collect();
            let (later, earlier): (Vec<&Commit>, Vec<&Commit>) = commits
                .iter()
                .filter(|c| using.contains(&c.repository.as_str()))
                .partition(|c| c.date >= midpoint);

            LanguageProficiency {
                proficiency_score: (share.percentage * 2.0).min(100.0),
                recent_activity: earlier.len() + later.len(),
                trend: Trend::between(earlier.len(), later.len()),
                language: share.language,
            }
        })
        .collect()
}

/// Metrics over the activity window ending at `now`
pub fn derive_productivity<Tz: TimeZone>(
    commits: &[Commit],
    repos: &[RepositoryLanguages],
    now: &DateTime<Tz>,
) -> ProductivityMetrics {
    let midpoint = now.with_timezone(&Utc) - Duration::hours(ACTIVITY_WINDOW_DAYS * 12);
    ProductivityMetrics {
        coding_velocity: coding_velocity(commits, now),
        peak_hours: peak_hours(commits, &now.timezone()),
        language_proficiency: language_proficiency(commits, repos, midpoint),
        focus_metrics: focus_metrics(&sessions(commits.iter().map(|c| c.date))),
    }
}

pub async fn fetch_productivity_metrics<T: Transport>(
    github: &GitHub<T>,
    service: &ServiceConfig,
) -> Result<ProductivityMetrics, GitHubError> {
    let commits = github.fetch_recent_commits(service).await?;
    let repos = github.fetch_repository_languages(service).await?;
    let now = github.now().with_timezone(&Local);
    Ok(derive_productivity(&commits, &repos, &now))
}
