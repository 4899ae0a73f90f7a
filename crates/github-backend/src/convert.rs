//! Model conversions from GitHub types to ghpr-core types

use chrono::{DateTime, Utc};
use ghpr_core::{CommentAuthor, CommentSource, PullRequest, RawComment};

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Login GitHub shows for comments whose author account was deleted
const GHOST_LOGIN: &str = "ghost";

impl From<GitHubPullRequest> for PullRequest {
    fn from(pr: GitHubPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            url: pr.html_url,
            head_ref: pr.head.map(|h| h.ref_name),
        }
    }
}

fn author_of(user: Option<GitHubUser>) -> CommentAuthor {
    CommentAuthor {
        login: user.map_or_else(|| GHOST_LOGIN.to_string(), |u| u.login),
    }
}

/// Convert a review comment, tagging it with its source endpoint
pub fn review_comment_to_core(c: GitHubReviewComment) -> Result<RawComment> {
    Ok(RawComment {
        source: CommentSource::Review,
        author: author_of(c.user),
        created: parse_github_datetime(&c.created_at)?,
        updated: parse_github_datetime(&c.updated_at)?,
        body: c.body,
        url: c.html_url,
    })
}

/// Convert a conversation comment, tagging it with its source endpoint
pub fn issue_comment_to_core(c: GitHubIssueComment) -> Result<RawComment> {
    Ok(RawComment {
        source: CommentSource::Issue,
        author: author_of(c.user),
        created: parse_github_datetime(&c.created_at)?,
        updated: parse_github_datetime(&c.updated_at)?,
        body: c.body,
        url: c.html_url,
    })
}

/// Parse GitHub's ISO 8601 timestamps (e.g. "2024-01-15T10:30:00Z")
fn parse_github_datetime(dt: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(dt)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| GitHubError::InvalidTimestamp(dt.to_string()))
}
