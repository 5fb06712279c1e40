// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Hook slot management.
//!
//! A __hook slot__ is the file Git runs for one hook, i.e.,
//! `<git_dir>/hooks/<name>`. Each slot is always in exactly one
//! [`HookState`]: absent, user-authored, or generated by leash.
//!
//! # Slot Transitions
//!
//! Installing only ever turns an absent slot into a generated one.
//! Uninstalling only ever turns a generated slot back into an absent one.
//! User-authored hooks are never written to or removed, and neither is a
//! generated hook overwritten on install. Reinstalling a hook therefore
//! requires uninstalling it first.
//!
//! ```text
//! absent        --install-->   generated
//! generated     --uninstall--> absent
//! user-authored --install-->   user-authored
//! user-authored --uninstall--> user-authored
//! ```

pub mod lookup;
pub mod script;

use crate::{
    hook::{lookup::HookCommand, script::HookScript},
    locate::RepositoryLocation,
};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{self, create_dir_all, remove_file, symlink_metadata, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// State of a hook slot on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    /// Nothing exists at the slot.
    Absent,

    /// Slot holds something leash did not generate.
    UserAuthored,

    /// Slot holds a script generated by leash.
    Generated,
}

impl Display for HookState {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Absent => fmt.write_str("absent"),
            Self::UserAuthored => fmt.write_str("user-authored"),
            Self::Generated => fmt.write_str("generated"),
        }
    }
}

/// File Git runs for one hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSlot {
    name: String,
    path: PathBuf,
}

impl HookSlot {
    /// Construct new hook slot inside hooks directory.
    pub fn new(hooks_dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = hooks_dir.as_ref().join(&name);
        Self { name, path }
    }

    /// Name of hook.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to hook file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Determine current state of slot.
    ///
    /// Anything at the slot that cannot be read as a file, e.g., a directory
    /// or a dangling symlink, is considered user-authored.
    ///
    /// # Errors
    ///
    /// - Return [`HookError::ReadHook`] if slot cannot be inspected.
    pub fn state(&self) -> Result<HookState> {
        match symlink_metadata(&self.path) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HookState::Absent),
            Err(err) => {
                return Err(HookError::ReadHook {
                    source: err,
                    hook_path: self.path.clone(),
                })
            }
        }

        if !self.path.is_file() {
            return Ok(HookState::UserAuthored);
        }

        let content = fs::read(&self.path).map_err(|err| HookError::ReadHook {
            source: err,
            hook_path: self.path.clone(),
        })?;

        if HookScript::is_generated(content) {
            Ok(HookState::Generated)
        } else {
            Ok(HookState::UserAuthored)
        }
    }
}

/// Install and uninstall hooks of one repository.
#[derive(Debug, Clone)]
pub struct HookManager {
    location: RepositoryLocation,
}

impl HookManager {
    /// Construct new hook manager for resolved repository location.
    pub fn new(location: RepositoryLocation) -> Self {
        Self { location }
    }

    /// Hook slot of given hook name.
    pub fn slot(&self, name: impl Into<String>) -> HookSlot {
        HookSlot::new(self.location.hooks_dir(), name)
    }

    /// Install generated hooks into absent slots.
    ///
    /// Creates the hooks directory if needed. Slots already holding a file
    /// are left alone regardless of content.
    ///
    /// # Errors
    ///
    /// - Return [`HookError::CreateHooksDir`] if hooks directory cannot be
    ///   created.
    /// - Return [`HookError::WriteHook`] if a hook script cannot be written.
    /// - Return [`HookError::SetPermissions`] if a hook script cannot be made
    ///   executable.
    #[instrument(skip(self, commands), level = "debug")]
    pub fn install(&self, commands: impl IntoIterator<Item = HookCommand>) -> Result<()> {
        let hooks_dir = self.location.hooks_dir();
        create_dir_all(&hooks_dir).map_err(|err| HookError::CreateHooksDir {
            source: err,
            hooks_dir: hooks_dir.clone(),
        })?;

        for command in commands {
            let slot = self.slot(&command.hook);
            let script = HookScript::new(&command, &self.location.relative_path);
            let written = write_new_hook(&hooks_dir, &slot, |file| {
                file.write_all(script.to_string().as_bytes())
            })?;
            if written {
                info!("install {} hook", slot.name());
            } else {
                warn!(
                    "skip {} hook, {:?} already exists",
                    slot.name(),
                    slot.path().display()
                );
            }
        }

        Ok(())
    }

    /// Remove generated hooks.
    ///
    /// Slots holding user-authored hooks are left alone. The hooks directory
    /// itself is never removed.
    ///
    /// # Errors
    ///
    /// - Return [`HookError::ReadHook`] if a slot cannot be inspected.
    /// - Return [`HookError::RemoveHook`] if a generated hook cannot be
    ///   removed.
    #[instrument(skip(self, hooks), level = "debug")]
    pub fn uninstall(&self, hooks: impl IntoIterator<Item = impl Into<String>>) -> Result<()> {
        for name in hooks {
            let slot = self.slot(name);
            match slot.state()? {
                HookState::Generated => {
                    remove_file(slot.path()).map_err(|err| HookError::RemoveHook {
                        source: err,
                        hook_path: slot.path().to_path_buf(),
                    })?;
                    info!("uninstall {} hook", slot.name());
                }
                HookState::UserAuthored => {
                    debug!("keep user-authored {} hook", slot.name());
                }
                HookState::Absent => {}
            }
        }

        Ok(())
    }

    /// List state of each hook slot.
    ///
    /// # Errors
    ///
    /// - Return [`HookError::ReadHook`] if a slot cannot be inspected.
    pub fn status(
        &self,
        hooks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Vec<(HookSlot, HookState)>> {
        hooks
            .into_iter()
            .map(|name| {
                let slot = self.slot(name);
                slot.state().map(|state| (slot, state))
            })
            .collect()
    }
}

/// Write new hook into slot only if slot is free.
///
/// Content is staged in a temporary file inside the hooks directory, and only
/// linked into the slot once complete. A failed write leaves the slot absent.
///
/// Returns `false` if the slot was already taken.
fn write_new_hook(
    hooks_dir: &Path,
    slot: &HookSlot,
    stage: impl FnOnce(&mut File) -> std::io::Result<()>,
) -> Result<bool> {
    let write_error = |err: std::io::Error| HookError::WriteHook {
        source: err,
        hook_path: slot.path().to_path_buf(),
    };

    let mut staged = NamedTempFile::new_in(hooks_dir).map_err(write_error)?;
    stage(staged.as_file_mut()).map_err(write_error)?;
    staged.as_file_mut().flush().map_err(write_error)?;

    set_executable(staged.path()).map_err(|err| HookError::SetPermissions {
        source: err,
        hook_path: slot.path().to_path_buf(),
    })?;

    // INVARIANT: Persisting fails on existing slots, so nothing gets clobbered.
    match staged.persist_noclobber(slot.path()) {
        Ok(_) => Ok(true),
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(write_error(err.error)),
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Hook slot management error types.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// Hooks directory cannot be created when missing.
    #[error("failed to create hooks directory at {:?}", hooks_dir.display())]
    CreateHooksDir {
        #[source]
        source: std::io::Error,
        hooks_dir: PathBuf,
    },

    /// Hook script cannot be written.
    #[error("failed to write hook at {:?}", hook_path.display())]
    WriteHook {
        #[source]
        source: std::io::Error,
        hook_path: PathBuf,
    },

    /// Hook script cannot be made executable.
    #[error("failed to make hook at {:?} executable", hook_path.display())]
    SetPermissions {
        #[source]
        source: std::io::Error,
        hook_path: PathBuf,
    },

    /// Hook slot cannot be read from.
    #[error("failed to read hook at {:?}", hook_path.display())]
    ReadHook {
        #[source]
        source: std::io::Error,
        hook_path: PathBuf,
    },

    /// Generated hook cannot be removed.
    #[error("failed to remove hook at {:?}", hook_path.display())]
    RemoveHook {
        #[source]
        source: std::io::Error,
        hook_path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = HookError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::env::current_dir;

    fn manager() -> anyhow::Result<HookManager> {
        let root = current_dir()?;
        Ok(HookManager::new(RepositoryLocation {
            git_dir: root.join(".git"),
            relative_path: ".".into(),
            work_tree: root.clone(),
            project_root: root,
        }))
    }

    #[sealed_test]
    fn install_creates_hooks_dir_and_executable_script() -> anyhow::Result<()> {
        let manager = manager()?;
        manager.install([HookCommand::new("pre-commit", "cargo test")])?;

        let slot = manager.slot("pre-commit");
        assert_eq!(slot.state()?, HookState::Generated);
        let content = fs::read_to_string(slot.path())?;
        assert!(content.starts_with("#!/bin/sh\n"));
        assert!(content.contains("cd . || exit 1"));
        assert!(content.contains("cargo test || {"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(slot.path())?.permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }

        Ok(())
    }

    #[sealed_test]
    fn install_keeps_existing_hooks() -> anyhow::Result<()> {
        let manager = manager()?;
        fs::create_dir_all(".git/hooks")?;
        fs::write(".git/hooks/pre-push", "foo")?;

        manager.install([HookCommand::new("pre-push", "cargo test")])?;
        assert_eq!(fs::read_to_string(".git/hooks/pre-push")?, "foo");

        manager.uninstall(["pre-push"])?;
        assert_eq!(fs::read_to_string(".git/hooks/pre-push")?, "foo");

        Ok(())
    }

    #[sealed_test]
    fn install_does_not_rewrite_generated_hooks() -> anyhow::Result<()> {
        let manager = manager()?;
        manager.install([HookCommand::new("pre-commit", "first")])?;
        manager.install([HookCommand::new("pre-commit", "second")])?;

        let content = fs::read_to_string(".git/hooks/pre-commit")?;
        assert!(content.contains("first || {"));
        assert!(!content.contains("second"));

        Ok(())
    }

    #[sealed_test]
    fn uninstall_removes_only_generated_hooks() -> anyhow::Result<()> {
        let manager = manager()?;
        fs::create_dir_all(".git/hooks")?;
        fs::write(".git/hooks/commit-msg", "#!/bin/sh\nexit 0\n")?;
        manager.install([
            HookCommand::new("pre-commit", "cargo fmt --check"),
            HookCommand::new("commit-msg", "commitlint"),
        ])?;

        manager.uninstall(["pre-commit", "commit-msg", "pre-push"])?;

        assert_eq!(manager.slot("pre-commit").state()?, HookState::Absent);
        assert_eq!(manager.slot("commit-msg").state()?, HookState::UserAuthored);
        assert!(Path::new(".git/hooks").is_dir());

        Ok(())
    }

    #[sealed_test]
    fn status_reports_each_slot() -> anyhow::Result<()> {
        let manager = manager()?;
        fs::create_dir_all(".git/hooks")?;
        fs::write(".git/hooks/pre-push", "foo")?;
        manager.install([HookCommand::new("pre-commit", "cargo test")])?;

        let result = manager
            .status(["pre-commit", "pre-push", "post-merge"])?
            .into_iter()
            .map(|(slot, state)| (slot.name().to_string(), state))
            .collect::<Vec<_>>();
        let expect = vec![
            ("pre-commit".to_string(), HookState::Generated),
            ("pre-push".to_string(), HookState::UserAuthored),
            ("post-merge".to_string(), HookState::Absent),
        ];
        assert_eq!(result, expect);

        Ok(())
    }

    #[sealed_test]
    fn failed_write_leaves_slot_absent() -> anyhow::Result<()> {
        let manager = manager()?;
        let hooks_dir = manager.location.hooks_dir();
        fs::create_dir_all(&hooks_dir)?;
        let slot = manager.slot("pre-commit");

        let result = write_new_hook(&hooks_dir, &slot, |file| {
            file.write_all(b"#!/bin/sh\n")?;
            Err(std::io::Error::other("no space left on device"))
        });

        assert!(matches!(result, Err(HookError::WriteHook { .. })));
        assert_eq!(slot.state()?, HookState::Absent);
        assert_eq!(fs::read_dir(&hooks_dir)?.count(), 0);

        Ok(())
    }

    #[sealed_test]
    fn install_after_failed_write_generates_hook() -> anyhow::Result<()> {
        let manager = manager()?;
        let hooks_dir = manager.location.hooks_dir();
        fs::create_dir_all(&hooks_dir)?;
        let slot = manager.slot("pre-commit");
        let _ = write_new_hook(&hooks_dir, &slot, |_| {
            Err(std::io::Error::other("input/output error"))
        });

        manager.install([HookCommand::new("pre-commit", "cargo test")])?;
        assert_eq!(slot.state()?, HookState::Generated);

        manager.uninstall(["pre-commit"])?;
        assert_eq!(slot.state()?, HookState::Absent);

        Ok(())
    }

    #[sealed_test]
    fn install_reports_unusable_hooks_dir() -> anyhow::Result<()> {
        let manager = manager()?;
        fs::create_dir_all(".git")?;
        fs::write(".git/hooks", "not a directory")?;

        let result = manager.install([HookCommand::new("pre-commit", "cargo test")]);
        assert!(matches!(result, Err(HookError::CreateHooksDir { .. })));
        assert_eq!(fs::read_to_string(".git/hooks")?, "not a directory");

        Ok(())
    }

    #[sealed_test]
    fn directory_in_slot_is_user_authored() -> anyhow::Result<()> {
        let manager = manager()?;
        fs::create_dir_all(".git/hooks/pre-commit")?;

        assert_eq!(manager.slot("pre-commit").state()?, HookState::UserAuthored);
        manager.uninstall(["pre-commit"])?;
        assert!(Path::new(".git/hooks/pre-commit").is_dir());

        Ok(())
    }
}
