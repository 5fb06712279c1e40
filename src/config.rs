// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Projects may place a `leash.toml` file at their root to control what the
//! generated hooks run. The file is optional, and so is every table in it.
//!
//! # General Layout
//!
//! ```toml
//! [settings]
//! runner = "npm run"
//!
//! [hooks]
//! pre-commit = "cargo fmt --check"
//! pre-push = "cargo test"
//! ```
//!
//! Without a `[hooks]` table, leash installs the default hook set and each
//! hook runs the package script of the same name minus dashes through the
//! runner. With a `[hooks]` table, leash installs exactly the hooks listed
//! there, each running its command line as is.

use crate::hook::lookup::{is_git_hook, DEFAULT_RUNNER};

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Name of configuration file at project root.
pub const CONFIG_FILE: &str = "leash.toml";

/// Hook configuration layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HookConfig {
    /// General settings.
    pub settings: HookSettings,

    /// Explicit listing of hook names to command lines.
    pub hooks: Option<BTreeMap<String, String>>,
}

impl HookConfig {
    /// Load configuration of project.
    ///
    /// Missing configuration file means default configuration.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if configuration file exists, but cannot
    ///   be read.
    /// - Return any error of [`HookConfig::from_str`] for its content.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        let path = project_root.as_ref().join(CONFIG_FILE);
        match read_to_string(&path) {
            Ok(content) => {
                debug!("load configuration {:?}", path.display());
                content.parse()
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Read { source: err, path }),
        }
    }
}

impl FromStr for HookConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let config: HookConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Hook names become file names in the hooks directory.
        if let Some(hooks) = &config.hooks {
            if let Some(name) = hooks.keys().find(|name| !is_git_hook(name)) {
                return Err(ConfigError::UnknownHook { name: name.clone() });
            }
        }

        Ok(config)
    }
}

impl Display for HookConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// General configuration settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HookSettings {
    /// Command prefix used to run package scripts.
    pub runner: String,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            runner: DEFAULT_RUNNER.into(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file cannot be read.
    #[error("failed to read configuration file at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Configured hook name is not a Git hook.
    #[error("{name:?} is not a git hook")]
    UnknownHook { name: String },
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
