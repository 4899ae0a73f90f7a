use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReviewError;

/// Repository coordinates (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = ReviewError;

    /// Parse an `OWNER/REPO` string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name.trim_end_matches(".git")))
            }
            _ => Err(ReviewError::InvalidInput(format!(
                "expected the OWNER/REPO format, got '{}'",
                s
            ))),
        }
    }
}

/// Minimal pull request metadata needed to frame the comment listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// Canonical (browser) URL of the pull request
    pub url: String,
    /// Head branch name
    pub head_ref: Option<String>,
}

/// Which endpoint a comment was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentSource {
    /// Inline review comment attached to a diff line
    Review,
    /// Conversation comment on the pull request itself
    Issue,
}

/// Comment author information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub login: String,
}

/// A comment as delivered by one of the two list endpoints
#[derive(Debug, Clone)]
pub struct RawComment {
    pub source: CommentSource,
    pub author: CommentAuthor,
    pub body: String,
    pub url: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// The common shape used for ordering and display
///
/// Only the aggregator builds these; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedComment {
    author: String,
    body: String,
    url: String,
    created_at: DateTime<Utc>,
}

impl NormalizedComment {
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<RawComment> for NormalizedComment {
    fn from(c: RawComment) -> Self {
        Self {
            author: c.author.login,
            body: c.body,
            url: c.url,
            created_at: c.created,
        }
    }
}

/// Merged comments ordered by creation time, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentFeed {
    comments: Vec<NormalizedComment>,
}

impl CommentFeed {
    pub(crate) fn from_sorted(comments: Vec<NormalizedComment>) -> Self {
        Self { comments }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedComment> {
        self.comments.iter()
    }

    pub fn as_slice(&self) -> &[NormalizedComment] {
        &self.comments
    }
}

impl<'a> IntoIterator for &'a CommentFeed {
    type Item = &'a NormalizedComment;
    type IntoIter = std::slice::Iter<'a, NormalizedComment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}
