use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

const PER_PAGE: usize = 100;

/// GitHub REST API client bound to a single repository
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for `base_url` (api.github.com, a GitHub Enterprise
    /// `/api/v3` root, or a test server)
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    /// Get the owner for this client
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repo for this client
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Issue an authenticated GET and decode the JSON body
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(%url, "GET");

        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "ghpr")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response)?;
        let body = response.body_mut().read_to_string()?;
        let value: T = serde_json::from_str(&body)?;
        Ok(value)
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Detect rate limiting: 403 with x-ratelimit-remaining: 0
        if status == 403 {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining.to_str().unwrap_or("") == "0" {
                    return Err(GitHubError::RateLimited);
                }
            }
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Prefer the `message` field of a GitHub error document
        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            error_response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(&body)
                .to_string()
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        tracing::debug!(status, %message, "GitHub API error");

        match status {
            401 => Err(GitHubError::Unauthorized),
            404 => Err(GitHubError::NotFound(message)),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    /// Fetch every page of a list endpoint (`path` must not carry a query string)
    fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let filters: String = params
            .iter()
            .map(|(key, value)| format!("{}={}&", key, urlencoding::encode(value)))
            .collect();

        ghpr_core::fetch_all_pages(
            |page, per_page| {
                let url = format!(
                    "{}?{}per_page={}&page={}",
                    self.repo_url(path),
                    filters,
                    per_page,
                    page
                );
                self.get_json::<Vec<T>>(&url)
            },
            PER_PAGE,
        )
    }

    // ==================== Pull Request Operations ====================

    /// Get a pull request by number
    pub fn get_pull_request(&self, number: u64) -> Result<GitHubPullRequest> {
        let url = self.repo_url(&format!("/pulls/{}", number));

        self.get_json(&url).map_err(|e| match e {
            GitHubError::NotFound(_) => GitHubError::PullRequestNotFound(format!(
                "{}/{}#{}",
                self.owner, self.repo, number
            )),
            other => other,
        })
    }

    /// List open pull requests whose head is `head_owner:branch`
    pub fn list_pull_requests_for_branch(
        &self,
        head_owner: &str,
        branch: &str,
    ) -> Result<Vec<GitHubPullRequest>> {
        let head = format!("{}:{}", head_owner, branch);
        let url = format!(
            "{}?head={}&state=open&per_page={}",
            self.repo_url("/pulls"),
            urlencoding::encode(&head),
            PER_PAGE
        );

        self.get_json(&url)
    }

    /// List every open pull request of the repository
    pub fn list_open_pull_requests(&self) -> Result<Vec<GitHubPullRequest>> {
        self.get_all_pages("/pulls", &[("state", "open")])
    }

    // ==================== Comment Operations ====================

    /// List inline review comments on a pull request
    pub fn list_review_comments(&self, number: u64) -> Result<Vec<GitHubReviewComment>> {
        self.get_all_pages(&format!("/pulls/{}/comments", number), &[])
    }

    /// List conversation comments on a pull request
    pub fn list_issue_comments(&self, number: u64) -> Result<Vec<GitHubIssueComment>> {
        self.get_all_pages(&format!("/issues/{}/comments", number), &[])
    }
}
