//! Resolve which repository and pull request a command refers to

use anyhow::{anyhow, bail, Context, Result};
use ghpr_core::RepoRef;
use git2::Repository;
use std::path::Path;
use std::str::FromStr;

/// Remotes consulted for the base repository, in priority order
const REMOTE_PRIORITY: [&str; 3] = ["upstream", "github", "origin"];

/// How the user named a pull request on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrSelector {
    Number(u64),
    Url { repo: RepoRef, number: u64 },
    Branch(String),
}

impl FromStr for PrSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("pull request selector cannot be empty");
        }

        if let Ok(number) = s.strip_prefix('#').unwrap_or(s).parse::<u64>() {
            return Ok(Self::Number(number));
        }

        if s.starts_with("https://") || s.starts_with("http://") {
            return parse_pull_request_url(s)
                .map(|(repo, number)| Self::Url { repo, number })
                .ok_or_else(|| anyhow!("invalid pull request URL: {}", s));
        }

        Ok(Self::Branch(s.to_string()))
    }
}

/// Parse `https://HOST/OWNER/REPO/pull/NUMBER[/...]`
fn parse_pull_request_url(url: &str) -> Option<(RepoRef, u64)> {
    let rest = url.split_once("://")?.1;
    let rest = rest.split(['?', '#']).next()?;
    let mut segments = rest.split('/').skip(1);

    let owner = segments.next()?;
    let name = segments.next()?;
    if segments.next()? != "pull" {
        return None;
    }
    let number = segments.next()?.parse().ok()?;

    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((RepoRef::new(owner, name), number))
}

/// Parse a git remote URL pointing at a GitHub repository.
///
/// Accepts scp-like (`git@host:owner/repo.git`), `ssh://`, `git://` and
/// `http(s)://` forms.
pub fn parse_remote_url(url: &str) -> Option<RepoRef> {
    let url = url.trim();

    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/')?.1
    } else if let Some((host, path)) = url.split_once(':') {
        // scp-like syntax; a slash before the colon means a local path
        if host.contains('/') {
            return None;
        }
        path
    } else {
        return None;
    };

    let path = path.trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    path.parse().ok()
}

/// What to look up once the repository is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrTarget {
    Number(u64),
    /// Head branch, with the owner of the repository it was pushed to when known
    Branch { owner: Option<String>, name: String },
}

impl PrTarget {
    /// Branch target from an `OWNER:BRANCH` or plain `BRANCH` argument
    fn from_branch_arg(arg: String) -> Self {
        match arg.split_once(':') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Self::Branch {
                owner: Some(owner.to_string()),
                name: name.to_string(),
            },
            _ => Self::Branch {
                owner: None,
                name: arg,
            },
        }
    }
}

/// Pick the repository: a PR URL names its own, then the configured one, then git remotes
pub fn resolve_repo(
    configured: Option<&str>,
    selector: Option<&PrSelector>,
    cwd: &Path,
) -> Result<RepoRef> {
    if let Some(PrSelector::Url { repo, .. }) = selector {
        return Ok(repo.clone());
    }

    if let Some(repo) = configured {
        return repo
            .parse()
            .with_context(|| format!("invalid repository '{}'", repo));
    }

    if let Some(repo) = detect_repo_from_git(cwd) {
        tracing::debug!(%repo, "repository detected from git remote");
        return Ok(repo);
    }

    bail!("could not determine the repository; pass --repo OWNER/REPO or run inside a clone with a GitHub remote")
}

/// Turn the selector into a lookup target, falling back to the current branch
pub fn resolve_target(selector: Option<PrSelector>, cwd: &Path) -> Result<PrTarget> {
    match selector {
        Some(PrSelector::Number(number)) | Some(PrSelector::Url { number, .. }) => {
            Ok(PrTarget::Number(number))
        }
        Some(PrSelector::Branch(branch)) => Ok(PrTarget::from_branch_arg(branch)),
        None => {
            let repo = Repository::discover(cwd)
                .context("git: not a git repository")
                .context("could not query for pull request for current branch")?;
            let branch = current_branch(&repo)
                .context("could not query for pull request for current branch")?;
            let target = tracked_head(&repo, &branch);
            tracing::debug!(%branch, ?target, "using current branch");
            Ok(target)
        }
    }
}

/// First GitHub remote of the repository containing `dir`
fn detect_repo_from_git(dir: &Path) -> Option<RepoRef> {
    let repo = Repository::discover(dir).ok()?;

    REMOTE_PRIORITY.iter().find_map(|name| {
        let remote = repo.find_remote(name).ok()?;
        remote.url().and_then(parse_remote_url)
    })
}

/// Name of the branch HEAD points at, including an unborn branch
fn current_branch(repo: &Repository) -> Result<String> {
    if repo.head_detached().unwrap_or(false) {
        bail!("git: not on any branch");
    }

    let head = repo
        .find_reference("HEAD")
        .context("git: could not read HEAD")?;

    head.symbolic_target()
        .and_then(|target| target.strip_prefix("refs/heads/"))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("git: not on any branch"))
}

/// Where `branch` was pushed, from `branch.<name>.remote` and `branch.<name>.merge`.
///
/// A branch pushed to a fork lives under the fork owner's namespace, so the
/// owner of the tracking remote is what the pull request's head refers to.
/// Without tracking configuration the owner is left unknown.
fn tracked_head(repo: &Repository, branch: &str) -> PrTarget {
    let config = repo.config().ok();
    let setting = |key: &str| {
        config
            .as_ref()
            .and_then(|c| c.get_string(&format!("branch.{}.{}", branch, key)).ok())
    };

    let owner = setting("remote").and_then(|remote| {
        let remote = repo.find_remote(&remote).ok()?;
        remote.url().and_then(parse_remote_url).map(|r| r.owner)
    });
    let name = setting("merge")
        .and_then(|merge| merge.strip_prefix("refs/heads/").map(str::to_string))
        .unwrap_or_else(|| branch.to_string());

    PrTarget::Branch { owner, name }
}
