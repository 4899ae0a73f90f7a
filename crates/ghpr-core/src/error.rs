use thiserror::Error;

/// Errors shared by every pull request source
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Pull request not found: {0}")]
    PullRequestNotFound(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
