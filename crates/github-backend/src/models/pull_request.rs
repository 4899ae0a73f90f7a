use serde::{Deserialize, Serialize};

/// GitHub user (minimal representation)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
}

/// One side (head or base) of a pull request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubBranchRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// `owner:branch`
    pub label: Option<String>,
    pub sha: Option<String>,
}

/// GitHub pull request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubPullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub user: Option<GitHubUser>,
    pub head: Option<GitHubBranchRef>,
    pub base: Option<GitHubBranchRef>,
    pub created_at: String,
    pub updated_at: String,
}
