//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use reel_discovery::{DiscoveryConfig, MoviePage};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Settings from the config file, or defaults when there is none.
    pub config: CliConfig,
    /// File the config was read from.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        if let Some(path) = &config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Effective discovery settings: file, then environment.
    pub fn discovery(&self) -> DiscoveryConfig {
        self.config.discovery()
    }

    /// Build a discovery page from the effective settings.
    pub fn page(&self, config: &DiscoveryConfig) -> Result<MoviePage> {
        MoviePage::from_config(config).context("Cannot start movie search")
    }
}

/// Find a config file in `start` or any parent directory.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
