use ghpr_core::ReviewError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Pull request not found: {0}")]
    PullRequestNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for ReviewError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => ReviewError::Http(e.to_string()),
            GitHubError::Parse(e) => ReviewError::Parse(e.to_string()),
            GitHubError::PullRequestNotFound(id) => ReviewError::PullRequestNotFound(id),
            GitHubError::NotFound(what) => ReviewError::NotFound(what),
            GitHubError::InvalidTimestamp(ts) => {
                ReviewError::Parse(format!("invalid timestamp '{}'", ts))
            }
            GitHubError::Unauthorized => ReviewError::Unauthorized,
            GitHubError::RateLimited => ReviewError::RateLimited,
            GitHubError::Api { status, message } => ReviewError::Api { status, message },
        }
    }
}
