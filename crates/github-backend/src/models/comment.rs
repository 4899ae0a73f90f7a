use serde::{Deserialize, Serialize};

use super::pull_request::GitHubUser;

/// Comment on the pull request conversation (issues API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubIssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    /// `null` when the author's account was deleted
    pub user: Option<GitHubUser>,
    pub html_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Inline review comment on a pull request diff (pulls API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubReviewComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub user: Option<GitHubUser>,
    pub html_url: String,
    pub created_at: String,
    pub updated_at: String,
    pub path: Option<String>,
    pub pull_request_review_id: Option<u64>,
}
