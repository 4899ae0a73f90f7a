use chrono::{DateTime, Utc};
use colored::Colorize;
use ghpr_core::{CommentFeed, NormalizedComment};

use crate::markdown;

/// Notice printed in place of an empty feed
pub const NO_COMMENTS: &str = "No Comments.";

/// Formats a comment feed for a terminal of fixed width
pub struct Renderer {
    width: usize,
    now: DateTime<Utc>,
}

impl Renderer {
    /// `now` anchors the relative time phrases
    pub fn new(width: usize, now: DateTime<Utc>) -> Self {
        Self {
            width: width.max(1),
            now,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// One text block per comment, or the single empty-feed notice
    pub fn render(&self, feed: &CommentFeed) -> Vec<String> {
        if feed.is_empty() {
            return vec![NO_COMMENTS.to_string()];
        }
        feed.iter().map(|c| self.render_comment(c)).collect()
    }

    fn render_comment(&self, comment: &NormalizedComment) -> String {
        let header = format!(
            "@{} {} {}",
            comment.author().bold(),
            relative_time(comment.created(), self.now).bright_black(),
            comment.url().blue()
        );
        let body = markdown::render(comment.body(), self.width);

        if body.is_empty() {
            header
        } else {
            format!("{}\n{}", header, body)
        }
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 12 * MONTH;
const LONG_TIME: i64 = 37 * YEAR;

/// Human phrase for the distance between `then` and `now`, e.g. "3 days ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let (secs, suffix) = if delta < 0 {
        (-delta, "from now")
    } else {
        (delta, "ago")
    };

    let phrase = match secs {
        0 => return "now".to_string(),
        1 => "1 second".to_string(),
        s if s < MINUTE => format!("{} seconds", s),
        s if s < 2 * MINUTE => "1 minute".to_string(),
        s if s < HOUR => format!("{} minutes", s / MINUTE),
        s if s < 2 * HOUR => "1 hour".to_string(),
        s if s < DAY => format!("{} hours", s / HOUR),
        s if s < 2 * DAY => "1 day".to_string(),
        s if s < WEEK => format!("{} days", s / DAY),
        s if s < 2 * WEEK => "1 week".to_string(),
        s if s < MONTH => format!("{} weeks", s / WEEK),
        s if s < 2 * MONTH => "1 month".to_string(),
        s if s < YEAR => format!("{} months", s / MONTH),
        s if s < 18 * MONTH => "1 year".to_string(),
        s if s < 2 * YEAR => "2 years".to_string(),
        s if s < LONG_TIME => format!("{} years", s / YEAR),
        _ => "a long while".to_string(),
    };

    format!("{} {}", phrase, suffix)
}
