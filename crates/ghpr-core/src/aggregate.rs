use crate::models::{CommentFeed, NormalizedComment, RawComment};

/// Merge review and issue comments into one feed ordered by creation time.
///
/// Review comments are concatenated ahead of issue comments and the sort is
/// stable, so on equal timestamps a review comment precedes an issue comment
/// and each input keeps its own relative order.
pub fn aggregate(review_comments: Vec<RawComment>, issue_comments: Vec<RawComment>) -> CommentFeed {
    let mut comments: Vec<NormalizedComment> = review_comments
        .into_iter()
        .chain(issue_comments)
        .map(NormalizedComment::from)
        .collect();

    comments.sort_by_key(NormalizedComment::created);

    CommentFeed::from_sorted(comments)
}
