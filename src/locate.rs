// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Git directory resolution.
//!
//! Leash needs two things from the repository that encloses a project: the
//! __git directory__ where hooks live, and the path from the repository's
//! working tree root to the project root. The generated hooks change into
//! that path before running anything, because Git always runs hooks from the
//! top of the working tree.
//!
//! # Submodules
//!
//! The working tree of a submodule does not contain a `.git` directory.
//! Instead, Git relocates the submodule's git directory into the
//! superproject at `.git/modules/<name>`, and leaves a one line __link file__
//! named `.git` in the submodule's working tree that points back at it:
//!
//! ```text
//! gitdir: ../../.git/modules/A/B
//! ```
//!
//! The link target is relative to the directory holding the link file. Both
//! the `gitdir:` prefix Git writes, and the shorter `git:` prefix are
//! understood. Only one level of indirection is followed, so the target of a
//! link must be an actual directory.
//!
//! # Dependency Installs
//!
//! Package managers usually hand leash the path of its own installed package,
//! e.g., `<project>/node_modules/leash`. The project root is the directory
//! holding `node_modules`. Paths crossing more than one `node_modules`
//! directory belong to a dependency of a dependency, and never resolve.

use crate::path::{normalize, project_root, relative_slash_path, NestedDependency};

use std::{
    fs::read_to_string,
    path::{absolute, Path, PathBuf},
};
use tracing::{debug, instrument};

/// Name of the git metadata entry at the top of a working tree.
pub const GIT_METADATA: &str = ".git";

/// Name of hooks directory inside of a git directory.
pub const HOOKS_DIR: &str = "hooks";

/// Where a project sits in its enclosing repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    /// Absolute path to git directory.
    pub git_dir: PathBuf,

    /// Slash separated path from working tree root to project root, or "."
    /// when they are the same directory.
    pub relative_path: String,

    /// Absolute path to working tree root.
    pub work_tree: PathBuf,

    /// Absolute path to project root.
    pub project_root: PathBuf,
}

impl RepositoryLocation {
    /// Path to hooks directory of git directory.
    pub fn hooks_dir(&self) -> PathBuf {
        self.git_dir.join(HOOKS_DIR)
    }
}

/// Git metadata entry found at the top of a working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitMetadata {
    /// Plain `.git` directory.
    Directory(PathBuf),

    /// Link file pointing to a git directory stored elsewhere.
    SubmoduleLink { link: PathBuf, git_dir: PathBuf },
}

impl GitMetadata {
    /// Inspect a potential git metadata entry.
    ///
    /// Returns `None` if nothing exists at `entry`.
    ///
    /// # Errors
    ///
    /// - Return [`LocateError::ReadLink`] if link file cannot be read.
    /// - Return [`LocateError::MalformedLink`] if link file content is not a
    ///   `gitdir: <path>` or `git: <path>` line.
    /// - Return [`LocateError::DanglingLink`] if link target is not a
    ///   directory.
    pub fn inspect(entry: impl AsRef<Path>) -> Result<Option<Self>> {
        let entry = entry.as_ref();
        if entry.is_dir() {
            return Ok(Some(Self::Directory(entry.to_path_buf())));
        }

        if !entry.is_file() {
            return Ok(None);
        }

        let content = read_to_string(entry).map_err(|err| LocateError::ReadLink {
            source: err,
            link: entry.to_path_buf(),
        })?;
        let target = parse_link(&content).ok_or_else(|| LocateError::MalformedLink {
            link: entry.to_path_buf(),
        })?;

        // INVARIANT: Relative link targets start from the link's directory.
        let base = entry.parent().unwrap_or(entry);
        let git_dir = normalize(base.join(target));
        if !git_dir.is_dir() {
            return Err(LocateError::DanglingLink {
                link: entry.to_path_buf(),
                git_dir,
            });
        }

        Ok(Some(Self::SubmoduleLink {
            link: entry.to_path_buf(),
            git_dir,
        }))
    }

    /// Path to actual git directory.
    pub fn git_dir(&self) -> &Path {
        match self {
            Self::Directory(git_dir) => git_dir,
            Self::SubmoduleLink { git_dir, .. } => git_dir,
        }
    }

    /// Path to working tree root that holds the metadata entry.
    pub fn work_tree(&self) -> &Path {
        let entry = match self {
            Self::Directory(git_dir) => git_dir,
            Self::SubmoduleLink { link, .. } => link,
        };

        entry.parent().unwrap_or(entry)
    }
}

/// Resolve repository location of project at or above `start`.
///
/// Walks upward from the project root that owns `start` until a `.git` entry
/// turns up, following submodule links. A `.git` inside the installed
/// package itself, e.g., `node_modules/leash/.git`, is never considered.
///
/// # Errors
///
/// - Return [`LocateError::CurrentDir`] if `start` is relative and the current
///   directory cannot be determined.
/// - Return [`LocateError::NestedDependency`] if `start` is a dependency of a
///   dependency.
/// - Return [`LocateError::NotFound`] if no git metadata exists above the
///   project root.
/// - Return any error of [`GitMetadata::inspect`] for the nearest `.git`
///   entry.
#[instrument(skip(start), level = "debug")]
pub fn resolve(start: impl AsRef<Path>) -> Result<RepositoryLocation> {
    let start = normalize(absolute(start.as_ref()).map_err(LocateError::CurrentDir)?);
    let project_root = project_root(&start)?;
    debug!("project root of {:?} is {:?}", start.display(), project_root.display());

    let metadata = find_git_metadata(&project_root)?;
    debug!("found git metadata {metadata:?}");

    let work_tree = metadata.work_tree().to_path_buf();
    Ok(RepositoryLocation {
        git_dir: metadata.git_dir().to_path_buf(),
        relative_path: relative_slash_path(&work_tree, &project_root),
        work_tree,
        project_root,
    })
}

fn find_git_metadata(project_root: &Path) -> Result<GitMetadata> {
    for dir in project_root.ancestors() {
        if let Some(metadata) = GitMetadata::inspect(dir.join(GIT_METADATA))? {
            return Ok(metadata);
        }
    }

    Err(LocateError::NotFound {
        start: project_root.to_path_buf(),
    })
}

fn parse_link(content: &str) -> Option<&str> {
    let line = content.lines().next()?.trim();
    let target = line
        .strip_prefix("gitdir:")
        .or_else(|| line.strip_prefix("git:"))?
        .trim();

    (!target.is_empty()).then_some(target)
}

/// Git directory resolution error types.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// No git metadata exists at or above project root.
    #[error("no git directory found at or above {:?}", start.display())]
    NotFound { start: PathBuf },

    /// Start path is a dependency of a dependency.
    #[error(transparent)]
    NestedDependency(#[from] NestedDependency),

    /// Link file does not hold a `gitdir: <path>` line.
    #[error("malformed git link file at {:?}", link.display())]
    MalformedLink { link: PathBuf },

    /// Link file points to something that is not a directory.
    #[error("git link file at {:?} points to missing directory {:?}", link.display(), git_dir.display())]
    DanglingLink { link: PathBuf, git_dir: PathBuf },

    /// Link file cannot be read.
    #[error("failed to read git link file at {:?}", link.display())]
    ReadLink {
        #[source]
        source: std::io::Error,
        link: PathBuf,
    },

    /// Current directory cannot be determined to absolutize start path.
    #[error("cannot determine current directory")]
    CurrentDir(#[source] std::io::Error),
}

/// Friendly result alias :3
pub type Result<T, E = LocateError> = std::result::Result<T, E>;
