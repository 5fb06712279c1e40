// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Git hook installer for package lifecycle events.
//!
//! Leash writes small shell scripts into a repository's hooks directory so
//! that Git events, e.g., "before commit", run commands the project defines.
//! It is meant to be invoked by a package manager with the path of leash's
//! own installed package, e.g., `<project>/node_modules/leash`, but any path
//! inside a project works.
//!
//! # Entry Points
//!
//! - [`install_from`] resolves the repository, and writes generated hooks into
//!   every free hook slot.
//! - [`uninstall_from`] removes every generated hook it finds.
//! - [`status_from`] reports the state of each hook slot.
//!
//! None of these fail when no repository can be found. They log the reason,
//! and do nothing. Only genuine I/O failures while touching hook files, or a
//! broken configuration file, are reported as errors.
//!
//! # See Also
//!
//! 1. [githooks(5)](https://git-scm.com/docs/githooks)
//! 2. [`locate`]
//! 3. [`hook`]

pub mod config;
pub mod hook;
pub mod locate;
pub mod path;

pub use config::HookConfig;
pub use hook::{
    lookup::{CommandLookup, HookCommand, ScriptRunner},
    HookManager, HookSlot, HookState,
};
pub use locate::{resolve, RepositoryLocation};

use crate::{hook::lookup::GIT_HOOKS, locate::LocateError};

use std::{env, path::Path};
use tracing::{info, instrument, warn};

/// Environment variable that turns [`install_from`] into a no-op.
pub const SKIP_INSTALL_ENV: &str = "LEASH_SKIP_INSTALL";

/// Install hooks for project at or above `start`.
///
/// Hook commands come from the project's `leash.toml`, or the default
/// script runner when there is none.
///
/// # Errors
///
/// - Return [`Error::Config`] if project configuration is broken.
/// - Return [`Error::Hook`] if hooks cannot be written.
#[instrument(skip(start), level = "debug")]
pub fn install_from(start: impl AsRef<Path>) -> Result<()> {
    if skip_install() {
        info!("{SKIP_INSTALL_ENV} is set, skip hook installation");
        return Ok(());
    }

    let Some(location) = try_resolve(start) else {
        return Ok(());
    };

    let config = HookConfig::load(&location.project_root)?;
    install_with(location, &config)
}

/// Install hooks for resolved location using given command lookup.
///
/// # Errors
///
/// - Return [`Error::Hook`] if hooks cannot be written.
pub fn install_with(location: RepositoryLocation, lookup: &impl CommandLookup) -> Result<()> {
    info!(
        "install hooks into {:?} for {:?}",
        location.hooks_dir().display(),
        location.relative_path
    );

    Ok(HookManager::new(location).install(lookup.commands())?)
}

/// Uninstall generated hooks for project at or above `start`.
///
/// Every Git hook slot is checked, so hooks generated under an older
/// configuration get removed too.
///
/// # Errors
///
/// - Return [`Error::Hook`] if generated hooks cannot be removed.
#[instrument(skip(start), level = "debug")]
pub fn uninstall_from(start: impl AsRef<Path>) -> Result<()> {
    let Some(location) = try_resolve(start) else {
        return Ok(());
    };

    info!("uninstall hooks from {:?}", location.hooks_dir().display());
    Ok(HookManager::new(location).uninstall(GIT_HOOKS.iter().copied())?)
}

/// Report state of every Git hook slot for project at or above `start`.
///
/// Returns `None` when no repository can be found.
///
/// # Errors
///
/// - Return [`Error::Hook`] if hook slots cannot be inspected.
pub fn status_from(start: impl AsRef<Path>) -> Result<Option<Vec<(HookSlot, HookState)>>> {
    let Some(location) = try_resolve(start) else {
        return Ok(None);
    };

    Ok(Some(
        HookManager::new(location).status(GIT_HOOKS.iter().copied())?,
    ))
}

fn try_resolve(start: impl AsRef<Path>) -> Option<RepositoryLocation> {
    match resolve(start.as_ref()) {
        Ok(location) => Some(location),
        Err(err @ (LocateError::NotFound { .. } | LocateError::NestedDependency(_))) => {
            info!("{err}, nothing to do");
            None
        }
        Err(err) => {
            warn!("{err}, nothing to do");
            None
        }
    }
}

fn skip_install() -> bool {
    env::var_os(SKIP_INSTALL_ENV).is_some_and(|value| !value.is_empty())
}

/// All possible error types of leash.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Hook slot manipulation fails.
    #[error(transparent)]
    Hook(#[from] crate::hook::HookError),

    /// Project configuration cannot be loaded.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
