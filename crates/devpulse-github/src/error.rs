#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("GitHub token and username are required")]
    MissingCredentials,

    #[error("GitHub API error: {status} for {url}")]
    Status { status: u16, url: String },

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("no GitHub request succeeded")]
    Unavailable,
}
