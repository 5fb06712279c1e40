// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Lexical path manipulation needed to place a project inside its enclosing
//! repository. Nothing in here touches the file system, so symbolic links are
//! never followed.

use std::{
    iter,
    path::{Component, Path, PathBuf},
};

/// Directory name package managers install dependencies into.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Lexically normalize a path.
///
/// Drops `.` components and folds each `..` into the component before it. A
/// `..` that would climb above the root of an absolute path is discarded,
/// while leading `..` components of a relative path are kept.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normal.components().next_back() {
                Some(Component::Normal(_)) => {
                    normal.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normal.push(".."),
            },
            other => normal.push(other.as_os_str()),
        }
    }

    normal
}

/// Determine path from `base` to `target` in forward-slash form.
///
/// Both paths are expected to be absolute and normalized. Yields `.` when both
/// paths are the same directory. Never yields a leading `./`.
pub fn relative_slash_path(base: impl AsRef<Path>, target: impl AsRef<Path>) -> String {
    let base = base.as_ref().components().collect::<Vec<_>>();
    let target = target.as_ref().components().collect::<Vec<_>>();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(lhs, rhs)| lhs == rhs)
        .count();

    let parts = iter::repeat("..".to_string())
        .take(base.len() - common)
        .chain(
            target[common..]
                .iter()
                .map(|part| part.as_os_str().to_string_lossy().into_owned()),
        )
        .collect::<Vec<_>>();

    if parts.is_empty() {
        return ".".into();
    }

    parts.join("/")
}

/// Determine root directory of the project that owns `path`.
///
/// When `path` sits inside a dependency installation directory, e.g.,
/// `<root>/node_modules/<pkg>` or `<root>/node_modules/@scope/<pkg>`, then the
/// directory holding that installation directory is the project root.
/// Otherwise `path` is the project root itself.
///
/// # Errors
///
/// - Return [`NestedDependency`] if `path` belongs to a dependency of a
///   dependency, i.e., it crosses more than one dependency installation
///   directory.
pub fn project_root(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let components = path.components().collect::<Vec<_>>();
    let installs = components
        .iter()
        .enumerate()
        .filter(|(_, component)| component.as_os_str() == DEPENDENCY_DIR)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    match installs.as_slice() {
        [] => Ok(path.to_path_buf()),
        [index] => Ok(components[..*index].iter().collect()),
        _ => Err(NestedDependency {
            path: path.to_path_buf(),
        }),
    }
}

/// Path belongs to a nested dependency installation.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{:?} is a dependency of a dependency", path.display())]
pub struct NestedDependency {
    pub path: PathBuf,
}

/// Friendly result alias :3
pub type Result<T, E = NestedDependency> = std::result::Result<T, E>;
