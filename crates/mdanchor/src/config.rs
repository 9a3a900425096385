//! Configuration file support
//!
//! Values come from (first hit wins): the `--config` path, `./mdanchor.toml`,
//! or `<config home>/mdanchor/config.toml`. CLI flags override everything.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base commit, tag, or branch to diff against.
    #[serde(default)]
    pub base: Option<String>,

    /// Directory the diff is limited to.
    #[serde(default)]
    pub dir: Option<String>,

    /// Where to write the Markdown change list.
    #[serde(default)]
    pub change_list_file: Option<String>,

    /// Request word-level (porcelain) diff output.
    #[serde(default)]
    pub word_diff: bool,
}

impl Config {
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(PathBuf::from(p)),
            None => Self::discover(),
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        Self::read_file(&path)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from("mdanchor.toml");
        if local.exists() {
            return Some(local);
        }
        let home = dirs::config_dir()?.join("mdanchor").join("config.toml");
        home.exists().then_some(home)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// CLI flags take precedence over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.base.is_some() {
            self.base = cli.base.clone();
        }
        if cli.dir.is_some() {
            self.dir = cli.dir.clone();
        }
        if cli.change_list_file.is_some() {
            self.change_list_file = cli.change_list_file.clone();
        }
        if cli.word_diff {
            self.word_diff = true;
        }
    }
}
