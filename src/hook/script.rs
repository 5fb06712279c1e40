// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Generated hook scripts.
//!
//! Every script leash writes carries [`MARKER`] on its second line. Leash
//! only ever deletes hook files that contain the marker, so hand-written
//! hooks stay safe even when they share a name with a generated one.

use crate::hook::lookup::HookCommand;

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Marker line identifying hook scripts generated by leash.
pub const MARKER: &str = "# leash: generated hook";

/// Environment variable that makes generated hooks exit early.
pub const SKIP_HOOKS_ENV: &str = "LEASH_SKIP_HOOKS";

/// Shell script for one hook slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookScript<'cmd> {
    command: &'cmd HookCommand,
    relative_path: &'cmd str,
}

impl<'cmd> HookScript<'cmd> {
    /// Construct new hook script.
    ///
    /// The script changes into `relative_path` from the working tree root
    /// before running the command.
    pub fn new(command: &'cmd HookCommand, relative_path: &'cmd str) -> Self {
        Self {
            command,
            relative_path,
        }
    }

    /// Check if hook file content was generated by leash.
    pub fn is_generated(content: impl AsRef<[u8]>) -> bool {
        content
            .as_ref()
            .windows(MARKER.len())
            .any(|window| window == MARKER.as_bytes())
    }
}

impl Display for HookScript<'_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        writeln!(fmt, "#!/bin/sh")?;
        writeln!(fmt, "{MARKER}")?;
        writeln!(
            fmt,
            "# Remove with `leash uninstall`, hand-written hooks are never touched."
        )?;
        writeln!(fmt)?;
        writeln!(fmt, "[ -n \"${SKIP_HOOKS_ENV}\" ] && exit 0")?;
        writeln!(fmt)?;
        writeln!(fmt, "cd {} || exit 1", shell_quote(self.relative_path))?;
        writeln!(fmt)?;

        if let Some(script) = &self.command.script {
            writeln!(fmt, "has_hook_script () {{")?;
            writeln!(
                fmt,
                "  [ -f package.json ] && grep -q \"\\\"$1\\\"[[:space:]]*:\" package.json"
            )?;
            writeln!(fmt, "}}")?;
            writeln!(fmt)?;
            writeln!(fmt, "has_hook_script {} || exit 0", shell_quote(script))?;
            writeln!(fmt)?;
        }

        writeln!(fmt, "{} || {{", self.command.command)?;
        writeln!(fmt, "  echo")?;
        writeln!(
            fmt,
            "  echo \"leash > {} hook failed (add --no-verify to bypass)\"",
            self.command.hook
        )?;
        writeln!(fmt, "  exit 1")?;
        writeln!(fmt, "}}")
    }
}

/// Quote word for POSIX shell only when it needs it.
fn shell_quote(word: &str) -> String {
    let is_plain = !word.is_empty()
        && word
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "/._-+@%:,".contains(ch));
    if is_plain {
        return word.to_string();
    }

    format!("'{}'", word.replace('\'', r"'\''"))
}
