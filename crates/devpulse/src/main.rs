mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, RepoAction};
use commands::Context;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "warn";

/// `RUST_LOG` when set and valid, otherwise warnings only
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

fn main() -> anyhow::Result<()> {
    // Absorbed fetch failures surface as warnings on stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter())
        .init();

    let cli = Cli::parse();
    if let Commands::Version = cli.command {
        return commands::version::run();
    }

    let ctx = Context::live(Duration::from_millis(cli.delay_ms))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Version => Ok(()),
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => commands::config::run_show(&ctx.store, &mut out),
            Some(ConfigAction::Set { token, username }) => commands::config::run_set(
                &ctx.store,
                token.as_deref(),
                username.as_deref(),
                &mut out,
            ),
            Some(ConfigAction::Enable) => commands::config::run_toggle(&ctx.store, true, &mut out),
            Some(ConfigAction::Disable) => {
                commands::config::run_toggle(&ctx.store, false, &mut out)
            }
            Some(ConfigAction::Verify) => {
                runtime.block_on(commands::config::run_verify(&ctx, &mut out))
            }
        },
        Commands::Repos { action } => match action {
            Some(RepoAction::List { search }) => {
                runtime.block_on(commands::repos::run_list(&ctx, search.as_deref(), &mut out))
            }
            None => runtime.block_on(commands::repos::run_list(&ctx, None, &mut out)),
            Some(RepoAction::Select { all: true, search, .. }) => runtime.block_on(
                commands::repos::run_select_all(&ctx, search.as_deref(), true, &mut out),
            ),
            Some(RepoAction::Select { repositories, .. }) => {
                commands::repos::run_select(&ctx.store, &repositories, &mut out)
            }
            Some(RepoAction::Deselect { all: true, search, .. }) => runtime.block_on(
                commands::repos::run_select_all(&ctx, search.as_deref(), false, &mut out),
            ),
            Some(RepoAction::Deselect { repositories, .. }) => {
                commands::repos::run_deselect(&ctx.store, &repositories, &mut out)
            }
            Some(RepoAction::Clear) => commands::repos::run_clear(&ctx.store, &mut out),
        },
        Commands::Branches { set } => {
            runtime.block_on(commands::branches::run(&ctx, &set, &mut out))
        }
        Commands::Commits => runtime.block_on(commands::activity::run_commits(&ctx, &mut out)),
        Commands::Prs => runtime.block_on(commands::activity::run_prs(&ctx, &mut out)),
        Commands::Stats => runtime.block_on(commands::activity::run_stats(&ctx, &mut out)),
        Commands::Suggest => runtime.block_on(commands::activity::run_suggest(&ctx, &mut out)),
        Commands::Productivity => {
            runtime.block_on(commands::activity::run_productivity(&ctx, &mut out))
        }
        Commands::Dashboard { watch } => runtime.block_on(commands::dashboard::run(
            &ctx,
            watch.map(Duration::from_secs),
            &mut out,
        )),
    }
}
