use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ghpr",
    version,
    about = "Read GitHub pull request comments in the terminal"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Repository to query, as OWNER/REPO (defaults to the current clone's GitHub remote)
    #[arg(long, short = 'R', env = "GHPR_REPO", global = true, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// GitHub API token (overrides config file)
    #[arg(long, env = "GHPR_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise (overrides config file)
    #[arg(long, env = "GHPR_API_URL", global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, env = "GHPR_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull request operations
    #[command(visible_alias = "p")]
    Pr {
        #[command(subcommand)]
        action: PrCommands,
    },
    /// Inspect the effective configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrCommands {
    /// Show review and conversation comments of a pull request, oldest first
    ///
    /// Without an argument, the open pull request for the current git branch is used.
    #[command(visible_alias = "c")]
    Comments {
        /// Pull request number, URL, or head branch name
        #[arg(value_name = "NUMBER | URL | BRANCH")]
        selector: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (token redacted)
    Show,
    /// Print the config file locations that are searched
    Path,
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "ghpr", &mut std::io::stdout());
    }
}
