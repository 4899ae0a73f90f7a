use crate::cli::{ConfigCommands, OutputFormat};
use crate::config::{config_paths, Config};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ConfigPath {
    path: PathBuf,
    exists: bool,
}

pub fn handle_config(
    config: &Config,
    explicit_path: Option<&Path>,
    action: &ConfigCommands,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let shown = config.redacted();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                OutputFormat::Text => print!("{}", toml::to_string_pretty(&shown)?),
            }
            Ok(())
        }
        ConfigCommands::Path => {
            let paths: Vec<ConfigPath> = config_paths(explicit_path)
                .into_iter()
                .map(|path| ConfigPath {
                    exists: path.exists(),
                    path,
                })
                .collect();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&paths)?),
                OutputFormat::Text => {
                    for entry in &paths {
                        let marker = if entry.exists { "" } else { " (not found)" };
                        println!("{}{}", entry.path.display(), marker);
                    }
                }
            }
            Ok(())
        }
    }
}
