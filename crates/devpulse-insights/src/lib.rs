//! Aggregations over GitHub activity: stats, suggestions, productivity

mod classifier;
mod productivity;
mod stats;
mod suggest;

pub use classifier::{Category, Classifier, KeywordTally, LanguageSplit};
pub use productivity::{
    derive_productivity, fetch_productivity_metrics, sessions, CodingVelocity, DailyVelocity,
    FocusBlock, FocusMetrics, HourlyActivity, LanguageProficiency, PeakHours,
    ProductivityMetrics, Session, Trend,
};
pub use stats::{day_streak, fetch_stats, GitHubStats, MAX_STREAK_DAYS};
pub use suggest::{fetch_smart_suggestion, recommend, SmartSuggestion, SuggestionKind};
