use super::{render, Context};
use anyhow::Context as _;
use devpulse_github::{GitHubError, Transport};
use devpulse_store::ConfigProvider;
use std::io::Write;

pub fn run_show(store: &impl ConfigProvider, out: &mut impl Write) -> anyhow::Result<()> {
    let mut config = store.load();
    let masked = render::mask_token(config.github.credentials.token().unwrap_or_default());
    config.github.credentials.set("token", &masked);
    writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
    Ok(())
}

pub fn run_set(
    store: &impl ConfigProvider,
    token: Option<&str>,
    username: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if token.is_none() && username.is_none() {
        anyhow::bail!("nothing to set: pass --token and/or --username");
    }

    store.update_service(|service| {
        if let Some(token) = token {
            service.credentials.set("token", token.trim());
        }
        if let Some(username) = username {
            service.credentials.set("username", username.trim());
        }
    });

    writeln!(out, "Saved GitHub credentials")?;
    if !store.service_credentials().is_complete() {
        writeln!(out, "Both a token and a username are needed to fetch activity")?;
    } else if !store.is_service_enabled() {
        writeln!(out, "Run `devpulse config enable` to show the GitHub widget")?;
    }
    Ok(())
}

pub fn run_toggle(
    store: &impl ConfigProvider,
    enabled: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    store.update_service(|service| service.enabled = enabled);
    let state = if enabled { "enabled" } else { "disabled" };
    writeln!(out, "GitHub widget {state}")?;
    Ok(())
}

pub async fn run_verify<P: ConfigProvider, T: Transport>(
    ctx: &Context<P, T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let config = ctx.store.load();
    match ctx.github.fetch_profile(&config.github).await {
        Ok(profile) => {
            let name = profile
                .name
                .map(|n| format!(" ({n})"))
                .unwrap_or_default();
            writeln!(
                out,
                "Authenticated as {}{}, {} public repositories",
                profile.login, name, profile.public_repos
            )?;
        }
        Err(GitHubError::MissingCredentials) => render::configuration_required(out)?,
        Err(e) => return Err(e).context("Failed to verify GitHub credentials"),
    }
    Ok(())
}
