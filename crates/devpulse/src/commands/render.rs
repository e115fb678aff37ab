//! Text rendering of the dashboard cards

use chrono::{DateTime, Duration, Local, Utc};
use devpulse_github::{Commit, LanguageShare, PrState, PullRequest};
use devpulse_insights::{GitHubStats, ProductivityMetrics, SmartSuggestion};
use std::io::Write;

/// Commits shown on the dashboard card
const COMMITS_SHOWN: usize = 6;
/// Pull requests shown on the dashboard card
const PRS_SHOWN: usize = 3;
const LANGUAGES_SHOWN: usize = 5;
const BAR_WIDTH: usize = 20;

pub fn time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let elapsed = now - then;
    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// Keep only the last four characters of a token
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count.saturating_sub(4)).collect();
    format!("{}{}", "*".repeat((count - 4).min(8)), tail)
}

fn bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn header(out: &mut impl Write, username: &str) -> std::io::Result<()> {
    writeln!(out, "GitHub Activity  @{username}")?;
    writeln!(out)
}

pub fn configuration_required(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "GitHub Activity")?;
    writeln!(out, "Configuration required")?;
    writeln!(out)?;
    writeln!(out, "GitHub credentials not configured")?;
    writeln!(
        out,
        "Please add your GitHub token and username in settings to view your activity"
    )?;
    writeln!(out, "  devpulse config set --token <token> --username <username>")
}

pub fn welcome(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Welcome to Your Dashboard")?;
    writeln!(
        out,
        "Get started by enabling and configuring the services you want to see on your dashboard."
    )?;
    writeln!(out, "  devpulse config enable")
}

pub fn commits(out: &mut impl Write, commits: &[Commit], now: DateTime<Utc>) -> std::io::Result<()> {
    writeln!(out, "Recent Commits (7 days)")?;
    if commits.is_empty() {
        writeln!(out, "  No commits found")?;
        return writeln!(out, "  Start coding to see your recent activity here");
    }
    for commit in commits.iter().take(COMMITS_SHOWN) {
        let subject = commit.message.lines().next().unwrap_or_default();
        writeln!(out, "  * {subject}")?;
        writeln!(
            out,
            "    {}  {}  {}",
            commit.repository,
            time_ago(now, commit.date),
            commit.sha.chars().take(7).collect::<String>()
        )?;
    }
    Ok(())
}

fn badge(state: PrState) -> &'static str {
    match state {
        PrState::Open => "[open]  ",
        PrState::Closed => "[closed]",
        PrState::Merged => "[merged]",
    }
}

pub fn pull_requests(
    out: &mut impl Write,
    pulls: &[PullRequest],
    now: DateTime<Utc>,
) -> std::io::Result<()> {
    writeln!(out, "Active Pull Requests")?;
    if pulls.is_empty() {
        return writeln!(out, "  No active pull requests");
    }
    for pr in pulls.iter().take(PRS_SHOWN) {
        writeln!(out, "  {} {}", badge(pr.state), pr.title)?;
        writeln!(
            out,
            "    #{} {}  Created {}  {} comments",
            pr.number,
            pr.repository,
            time_ago(now, pr.created_at),
            pr.comments
        )?;
    }
    Ok(())
}

pub fn languages(out: &mut impl Write, shares: &[LanguageShare]) -> std::io::Result<()> {
    if shares.is_empty() {
        return Ok(());
    }
    writeln!(out, "Language Distribution")?;
    for share in shares.iter().take(LANGUAGES_SHOWN) {
        writeln!(
            out,
            "  {:<12} {} {:>5.1}%  {}",
            share.language,
            bar(share.percentage),
            share.percentage,
            share.color
        )?;
    }
    Ok(())
}

pub fn stats(out: &mut impl Write, stats: &GitHubStats) -> std::io::Result<()> {
    writeln!(
        out,
        "Commits (7d): {}   PRs (7d): {}   Day Streak: {}",
        stats.total_commits, stats.total_prs, stats.streak_days
    )?;
    languages(out, &stats.language_distribution)
}

pub fn suggestion(out: &mut impl Write, suggestion: &SmartSuggestion) -> std::io::Result<()> {
    writeln!(out, "Smart Suggestion ({})", suggestion.kind.as_str())?;
    writeln!(out, "  {}", suggestion.message)?;
    for issue in &suggestion.issues {
        writeln!(out, "  - {} [{}]", issue.title, issue.repository)?;
        writeln!(out, "    {}", issue.url)?;
    }
    Ok(())
}

pub fn productivity(out: &mut impl Write, metrics: &ProductivityMetrics) -> std::io::Result<()> {
    let focus = &metrics.focus_metrics;
    writeln!(out, "Productivity Analytics")?;
    writeln!(
        out,
        "  Avg Session {}h   Longest Session {}h   Total Focus {}h   Interruption Rate {}",
        round1(focus.average_session_length),
        round1(focus.longest_session),
        round1(focus.total_focus_time),
        round1(focus.interruption_rate)
    )?;

    let velocity = &metrics.coding_velocity;
    let busiest = velocity.daily.iter().map(|d| d.commits).max().unwrap_or(0).max(1);
    writeln!(out, "  Coding Velocity ({})", velocity.trend.as_str())?;
    for day in &velocity.daily {
        writeln!(
            out,
            "    {} {} {}",
            day.date.format("%a %d"),
            bar(day.commits as f64 * 100.0 / busiest as f64),
            day.commits
        )?;
    }

    let peak = &metrics.peak_hours;
    match peak.most_productive_hour {
        Some(hour) => writeln!(out, "  Peak Hour {hour:02}:00")?,
        None => writeln!(out, "  Peak Hour -")?,
    }
    for block in &peak.focus_time_blocks {
        writeln!(
            out,
            "    Focus block {:02}:00-{:02}:00 ({}h)",
            block.start, block.end, block.duration
        )?;
    }

    if !metrics.language_proficiency.is_empty() {
        writeln!(out, "  Language Proficiency")?;
        for skill in &metrics.language_proficiency {
            writeln!(
                out,
                "    {:<12} {:>5.1}  {} commits  {}",
                skill.language,
                skill.proficiency_score,
                skill.recent_activity,
                skill.trend.as_str()
            )?;
        }
    }
    Ok(())
}

pub fn updated_at(out: &mut impl Write, now: DateTime<Utc>) -> std::io::Result<()> {
    writeln!(out, "Updated {}", now.with_timezone(&Local).format("%H:%M:%S"))
}
