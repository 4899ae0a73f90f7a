use crate::error::Result;
use crate::models::{PullRequest, RawComment};

/// A hosting service that can look up pull requests and list their comments.
///
/// An implementation is bound to a single repository. List operations return
/// every comment of the requested kind, unordered.
pub trait PullRequestSource {
    /// Get a pull request by number
    fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    /// Find the open pull request whose head is `branch`.
    ///
    /// `head_owner` names the account the branch was pushed to (a fork owner,
    /// say). When it is `None` the repository owner is tried first, then any
    /// open pull request with a head branch of that name.
    fn find_pull_request_for_branch(
        &self,
        head_owner: Option<&str>,
        branch: &str,
    ) -> Result<PullRequest>;

    /// List inline review comments (tagged `CommentSource::Review`)
    fn list_review_comments(&self, number: u64) -> Result<Vec<RawComment>>;

    /// List conversation comments (tagged `CommentSource::Issue`)
    fn list_issue_comments(&self, number: u64) -> Result<Vec<RawComment>>;
}
