use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "devpulse")]
#[command(version)]
#[command(about = "GitHub activity dashboard for the terminal")]
pub struct Cli {
    /// Pause between per-repository requests, in milliseconds
    #[arg(long, global = true, default_value_t = 200)]
    pub delay_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or change the GitHub settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// List and select repositories
    Repos {
        #[command(subcommand)]
        action: Option<RepoAction>,
    },

    /// List branches of the selected repositories
    Branches {
        /// Select a branch as `owner/name=branch` (repeatable)
        #[arg(long, value_parser = parse_branch)]
        set: Vec<(String, String)>,
    },

    /// Recent commits (7 days)
    Commits,

    /// Active pull requests
    Prs,

    /// Commit and PR totals, day streak, language distribution
    Stats,

    /// Smart suggestion with matching open issues
    Suggest,

    /// Productivity analytics
    Productivity,

    /// Full activity dashboard
    Dashboard {
        /// Refresh every N seconds, restarting when settings change
        #[arg(short, long)]
        watch: Option<u64>,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the stored settings with the token masked
    Show,
    /// Store credentials
    Set {
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Show the GitHub widget on the dashboard
    Enable,
    /// Hide the GitHub widget
    Disable,
    /// Check the stored credentials against the API
    Verify,
}

#[derive(Subcommand)]
pub enum RepoAction {
    /// List accessible repositories
    #[command(visible_alias = "ls")]
    List {
        /// Case-insensitive filter on name or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add repositories to the selection
    Select {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        repositories: Vec<String>,
        /// Every accessible repository matching --search (or all of them)
        #[arg(long)]
        all: bool,
        #[arg(short, long, requires = "all")]
        search: Option<String>,
    },
    /// Remove repositories from the selection
    Deselect {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        repositories: Vec<String>,
        #[arg(long)]
        all: bool,
        #[arg(short, long, requires = "all")]
        search: Option<String>,
    },
    /// Clear the selection
    Clear,
}

fn parse_branch(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((repo, branch)) if repo.contains('/') && !branch.is_empty() => {
            Ok((repo.to_string(), branch.to_string()))
        }
        _ => Err(format!("expected owner/name=branch, got `{value}`")),
    }
}
