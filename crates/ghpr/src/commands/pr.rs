use crate::cli::{OutputFormat, PrCommands};
use crate::config::Config;
use crate::context::{self, PrSelector, PrTarget};
use crate::output::write_lines;
use crate::render::Renderer;
use crate::terminal;
use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use ghpr_core::{aggregate, CommentFeed, PullRequest, PullRequestSource};
use github_backend::GitHubClient;
use serde::Serialize;
use std::io::{self, Write};

pub fn handle_pr(config: &Config, action: &PrCommands, format: OutputFormat) -> Result<()> {
    match action {
        PrCommands::Comments { selector } => handle_comments(config, selector.as_deref(), format),
    }
}

fn handle_comments(config: &Config, selector: Option<&str>, format: OutputFormat) -> Result<()> {
    let selector = selector.map(str::parse::<PrSelector>).transpose()?;
    let cwd = std::env::current_dir()?;

    let repo = context::resolve_repo(config.repo.as_deref(), selector.as_ref(), &cwd)?;
    let target = context::resolve_target(selector, &cwd)?;
    tracing::info!(%repo, ?target, api_url = config.api_url(), "resolved pull request context");

    let token = config.token.as_deref().unwrap_or_default();
    let client = GitHubClient::with_base_url(config.api_url(), &repo.owner, &repo.name, token);
    let renderer = Renderer::new(terminal::terminal_width(), Utc::now());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    show_comments(&client, &target, &renderer, format, &mut out)
}

/// Everything printed for one invocation
#[derive(Debug, Serialize)]
struct CommentsReport {
    number: u64,
    title: String,
    url: String,
    comments: CommentFeed,
}

/// Look up the pull request, fetch both comment lists, then print.
///
/// Nothing is written unless every lookup and fetch succeeded.
pub fn show_comments(
    source: &dyn PullRequestSource,
    target: &PrTarget,
    renderer: &Renderer,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let report = fetch_report(source, target)?;

    let lines = match format {
        OutputFormat::Text => text_lines(&report, renderer),
        OutputFormat::Json => vec![serde_json::to_string_pretty(&report)?],
    };

    write_lines(out, &lines).context("failed to write output")?;
    Ok(())
}

fn fetch_report(source: &dyn PullRequestSource, target: &PrTarget) -> Result<CommentsReport> {
    let pr = lookup_pull_request(source, target)?;

    let review_comments = source
        .list_review_comments(pr.number)
        .context("failed to get PR review comments")?;
    let issue_comments = source
        .list_issue_comments(pr.number)
        .context("failed to get issue comments")?;

    tracing::debug!(
        review = review_comments.len(),
        issue = issue_comments.len(),
        "fetched comments for #{}",
        pr.number
    );

    Ok(CommentsReport {
        number: pr.number,
        title: pr.title,
        url: pr.url,
        comments: aggregate(review_comments, issue_comments),
    })
}

fn lookup_pull_request(source: &dyn PullRequestSource, target: &PrTarget) -> Result<PullRequest> {
    match target {
        PrTarget::Number(number) => source
            .get_pull_request(*number)
            .with_context(|| format!("could not query pull request #{}", number)),
        PrTarget::Branch { owner, name } => source
            .find_pull_request_for_branch(owner.as_deref(), name)
            .with_context(|| format!("could not query for pull request for branch '{}'", name)),
    }
}

fn text_lines(report: &CommentsReport, renderer: &Renderer) -> Vec<String> {
    let mut lines = vec![
        format!("Pull Request #{} Comments", report.number),
        String::new(),
    ];

    for block in renderer.render(&report.comments) {
        lines.push(block);
        lines.push(String::new());
    }

    lines.push(format!("Pull Request URL: {}", report.url.blue()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};
    use ghpr_core::{CommentAuthor, CommentSource, RawComment, ReviewError};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn raw(source: CommentSource, login: &str, body: &str, created: DateTime<Utc>) -> RawComment {
        RawComment {
            source,
            author: CommentAuthor {
                login: login.to_string(),
            },
            body: body.to_string(),
            url: format!("https://github.com/o/r/pull/42#{}", login),
            created,
            updated: created,
        }
    }

    #[derive(Default)]
    struct FakeSource {
        review: Vec<RawComment>,
        issue: Vec<RawComment>,
        fail_review: bool,
        fail_issue: bool,
        /// (head owner, branch) that has an open pull request
        branch: Option<(Option<String>, String)>,
    }

    impl FakeSource {
        fn pull_request(number: u64) -> PullRequest {
            PullRequest {
                number,
                title: "Add comments view".to_string(),
                url: format!("https://github.com/o/r/pull/{}", number),
                head_ref: Some("feature".to_string()),
            }
        }
    }

    impl PullRequestSource for FakeSource {
        fn get_pull_request(&self, number: u64) -> ghpr_core::Result<PullRequest> {
            if number == 404 {
                return Err(ReviewError::PullRequestNotFound(format!("o/r#{}", number)));
            }
            Ok(Self::pull_request(number))
        }

        fn find_pull_request_for_branch(
            &self,
            head_owner: Option<&str>,
            branch: &str,
        ) -> ghpr_core::Result<PullRequest> {
            match &self.branch {
                Some((owner, b)) if b == branch && owner.as_deref() == head_owner => {
                    Ok(Self::pull_request(7))
                }
                _ => Err(ReviewError::PullRequestNotFound(format!(
                    "no open pull requests found for branch '{}'",
                    branch
                ))),
            }
        }

        fn list_review_comments(&self, _number: u64) -> ghpr_core::Result<Vec<RawComment>> {
            if self.fail_review {
                return Err(ReviewError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(self.review.clone())
        }

        fn list_issue_comments(&self, _number: u64) -> ghpr_core::Result<Vec<RawComment>> {
            if self.fail_issue {
                return Err(ReviewError::Unauthorized);
            }
            Ok(self.issue.clone())
        }
    }

    fn run(source: &FakeSource, target: PrTarget, format: OutputFormat) -> (Result<()>, String) {
        colored::control::set_override(false);
        let renderer = Renderer::new(80, t0() + Duration::days(3));
        let mut out = Vec::new();
        let result = show_comments(source, &target, &renderer, format, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_header_feed_and_url_in_time_order() {
        let source = FakeSource {
            review: vec![raw(CommentSource::Review, "a", "Looks **good**", t0())],
            issue: vec![raw(
                CommentSource::Issue,
                "b",
                "Thanks",
                t0() + Duration::seconds(1),
            )],
            ..FakeSource::default()
        };

        let (result, out) = run(&source, PrTarget::Number(42), OutputFormat::Text);
        result.unwrap();
        assert_eq!(
            out,
            "Pull Request #42 Comments\n\
             \n\
             @a 3 days ago https://github.com/o/r/pull/42#a\n\
             Looks good\n\
             \n\
             @b 2 days ago https://github.com/o/r/pull/42#b\n\
             Thanks\n\
             \n\
             Pull Request URL: https://github.com/o/r/pull/42\n"
        );
    }

    #[test]
    fn empty_pull_request_prints_notice() {
        let (result, out) = run(&FakeSource::default(), PrTarget::Number(1), OutputFormat::Text);
        result.unwrap();
        assert_eq!(
            out,
            "Pull Request #1 Comments\n\nNo Comments.\n\nPull Request URL: https://github.com/o/r/pull/1\n"
        );
    }

    #[test]
    fn branch_target_uses_branch_lookup() {
        let source = FakeSource {
            branch: Some((None, "feature".to_string())),
            ..FakeSource::default()
        };
        let target = PrTarget::Branch {
            owner: None,
            name: "feature".into(),
        };
        let (result, out) = run(&source, target, OutputFormat::Text);
        result.unwrap();
        assert!(out.starts_with("Pull Request #7 Comments"));
    }

    #[test]
    fn branch_target_passes_head_owner() {
        let source = FakeSource {
            branch: Some((Some("me".to_string()), "topic".to_string())),
            ..FakeSource::default()
        };
        let target = PrTarget::Branch {
            owner: Some("me".into()),
            name: "topic".into(),
        };
        let (result, out) = run(&source, target, OutputFormat::Text);
        result.unwrap();
        assert!(out.starts_with("Pull Request #7 Comments"));
    }

    #[test]
    fn missing_branch_pull_request_is_fatal_and_silent() {
        let target = PrTarget::Branch {
            owner: None,
            name: "nope".into(),
        };
        let (result, out) = run(&FakeSource::default(), target, OutputFormat::Text);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("could not query for pull request for branch 'nope'"));
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_number_is_fatal() {
        let (result, out) = run(&FakeSource::default(), PrTarget::Number(404), OutputFormat::Text);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("could not query pull request #404"));
        assert!(message.contains("Pull request not found: o/r#404"));
        assert!(out.is_empty());
    }

    #[test]
    fn review_fetch_failure_names_the_fetch_and_prints_nothing() {
        let source = FakeSource {
            fail_review: true,
            issue: vec![raw(CommentSource::Issue, "b", "hi", t0())],
            ..FakeSource::default()
        };
        let (result, out) = run(&source, PrTarget::Number(42), OutputFormat::Text);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("failed to get PR review comments"));
        assert!(out.is_empty());
    }

    #[test]
    fn issue_fetch_failure_names_the_fetch_and_prints_nothing() {
        let source = FakeSource {
            fail_issue: true,
            review: vec![raw(CommentSource::Review, "a", "hi", t0())],
            ..FakeSource::default()
        };
        let (result, out) = run(&source, PrTarget::Number(42), OutputFormat::Json);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("failed to get issue comments"));
        assert!(out.is_empty());
    }

    #[test]
    fn json_output_carries_sorted_comments() {
        let source = FakeSource {
            review: vec![raw(CommentSource::Review, "late", "x", t0() + Duration::hours(1))],
            issue: vec![raw(CommentSource::Issue, "early", "y", t0())],
            ..FakeSource::default()
        };

        let (result, out) = run(&source, PrTarget::Number(42), OutputFormat::Json);
        result.unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["number"], 42);
        assert_eq!(json["url"], "https://github.com/o/r/pull/42");
        assert_eq!(json["comments"][0]["author"], "early");
        assert_eq!(json["comments"][1]["author"], "late");
        assert_eq!(json["comments"][1]["created_at"], "2024-01-15T11:30:00Z");
    }
}
