use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const LOCAL_CONFIG_FILE_NAME: &str = ".ghpr.toml";

/// Effective configuration after layering files, environment and flags
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// GitHub API token
    pub token: Option<String>,
    /// API base URL (GitHub Enterprise: https://HOST/api/v3)
    pub api_url: Option<String>,
    /// Default repository as OWNER/REPO
    pub repo: Option<String>,
}

impl Config {
    /// Load configuration from the usual locations, or only `config_path` when given.
    ///
    /// Later sources win: `GH_TOKEN`, `GITHUB_TOKEN`, config files, `GHPR_*`.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&["GH_TOKEN"]).map(|_| "token".into()))
            .merge(Env::raw().only(&["GITHUB_TOKEN"]).map(|_| "token".into()));

        for path in config_paths(explicit_path) {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config file");
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("GHPR_").only(&["token", "api_url", "repo"]));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(
        &mut self,
        cli_repo: Option<String>,
        cli_token: Option<String>,
        cli_api_url: Option<String>,
    ) {
        if let Some(repo) = cli_repo {
            self.repo = Some(repo);
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
        }
        if let Some(api_url) = cli_api_url {
            self.api_url = Some(api_url);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.as_deref().map_or(true, str::is_empty) {
            return Err(anyhow!(
                "GitHub token not configured. Set via --token, GHPR_TOKEN, GITHUB_TOKEN or GH_TOKEN env var, or config file"
            ));
        }
        Ok(())
    }

    /// API base URL, defaulting to api.github.com
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Copy safe to print: the token is masked
    pub fn redacted(&self) -> Self {
        Self {
            token: self.token.as_ref().map(|t| redact(t)),
            api_url: Some(self.api_url().to_string()),
            repo: self.repo.clone(),
        }
    }
}

fn redact(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// Config files searched in order; later files override earlier ones
pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghpr").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("ghpr").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("ghpr")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE_NAME))
}
