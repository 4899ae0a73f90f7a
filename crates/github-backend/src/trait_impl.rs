//! Implementation of ghpr-core traits for GitHubClient

use ghpr_core::{PullRequest, PullRequestSource, RawComment, Result, ReviewError};

use crate::client::GitHubClient;
use crate::convert::{issue_comment_to_core, review_comment_to_core};

impl PullRequestSource for GitHubClient {
    fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let pr = self.get_pull_request(number).map_err(ReviewError::from)?;
        Ok(pr.into())
    }

    fn find_pull_request_for_branch(
        &self,
        head_owner: Option<&str>,
        branch: &str,
    ) -> Result<PullRequest> {
        let owner = head_owner.unwrap_or(self.owner());
        let found = self
            .list_pull_requests_for_branch(owner, branch)
            .map_err(ReviewError::from)?
            .into_iter()
            .next()
            .map(PullRequest::from);

        // Without a known head owner the branch may live in any fork
        let found = match (found, head_owner) {
            (Some(pr), _) => Some(pr),
            (None, Some(_)) => None,
            (None, None) => {
                tracing::debug!(%branch, "no PR from {}:{}, scanning open PRs", owner, branch);
                self.list_open_pull_requests()
                    .map_err(ReviewError::from)?
                    .into_iter()
                    .map(PullRequest::from)
                    .find(|pr| pr.head_ref.as_deref() == Some(branch))
            }
        };

        found.ok_or_else(|| {
            ReviewError::PullRequestNotFound(format!(
                "no open pull requests found for branch '{}' in {}/{}",
                branch,
                self.owner(),
                self.repo()
            ))
        })
    }

    fn list_review_comments(&self, number: u64) -> Result<Vec<RawComment>> {
        self.list_review_comments(number)
            .map_err(ReviewError::from)?
            .into_iter()
            .map(|c| review_comment_to_core(c).map_err(ReviewError::from))
            .collect()
    }

    fn list_issue_comments(&self, number: u64) -> Result<Vec<RawComment>> {
        self.list_issue_comments(number)
            .map_err(ReviewError::from)?
            .into_iter()
            .map(|c| issue_comment_to_core(c).map_err(ReviewError::from))
            .collect()
    }
}
