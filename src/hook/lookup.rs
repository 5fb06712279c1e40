// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Hook command lookup.
//!
//! Leash does not care where the command of a hook comes from. Anything that
//! can list pairs of hook names and command lines is a [`CommandLookup`].

use crate::config::HookConfig;

/// Every hook name Git knows about.
pub const GIT_HOOKS: &[&str] = &[
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "proc-receive",
    "post-receive",
    "post-update",
    "reference-transaction",
    "push-to-checkout",
    "pre-auto-gc",
    "post-rewrite",
    "sendemail-validate",
    "fsmonitor-watchman",
    "p4-changelist",
    "p4-prepare-changelist",
    "p4-post-changelist",
    "p4-pre-submit",
    "post-index-change",
];

/// Hooks installed when no explicit hook listing is configured.
pub const DEFAULT_HOOKS: &[&str] = &[
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "post-receive",
    "post-update",
    "pre-auto-gc",
    "post-rewrite",
];

/// Default command prefix used to run package scripts.
pub const DEFAULT_RUNNER: &str = "npm run";

/// Package managers whose runners look scripts up in `package.json`.
pub const PACKAGE_MANAGERS: &[&str] = &["npm", "pnpm", "yarn", "bun"];

/// Check if Git knows about hook name.
pub fn is_git_hook(name: impl AsRef<str>) -> bool {
    GIT_HOOKS.contains(&name.as_ref())
}

/// Command line to run for one hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCommand {
    /// Name of hook, e.g., "pre-commit".
    pub hook: String,

    /// Shell command line to run.
    pub command: String,

    /// Package script the command depends on, if any.
    ///
    /// Generated hooks exit quietly when the project does not define it.
    pub script: Option<String>,
}

impl HookCommand {
    /// Construct new hook command.
    pub fn new(hook: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            hook: hook.into(),
            command: command.into(),
            script: None,
        }
    }

    /// Construct new hook command that runs a package script.
    pub fn with_script(
        hook: impl Into<String>,
        command: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            hook: hook.into(),
            command: command.into(),
            script: Some(script.into()),
        }
    }
}

/// Source of hook commands.
pub trait CommandLookup {
    /// List hook commands in install order.
    fn commands(&self) -> Vec<HookCommand>;
}

/// Run package scripts named after hooks.
///
/// Maps each of [`DEFAULT_HOOKS`] to `<runner> <script>`, where the script
/// name is the hook name without dashes, e.g., "pre-commit" runs
/// `npm run precommit`.
///
/// Only runners of a known package manager depend on `package.json`, so only
/// their hooks skip themselves when the project lacks the script. Any other
/// runner, e.g., `make`, is invoked unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRunner {
    runner: String,
}

impl ScriptRunner {
    /// Construct new script runner with command prefix.
    pub fn new(runner: impl Into<String>) -> Self {
        Self {
            runner: runner.into(),
        }
    }

    /// Name of package script for a hook.
    pub fn script_name(hook: &str) -> String {
        hook.replace('-', "")
    }

    /// Check if runner resolves scripts through `package.json`.
    pub fn runs_package_scripts(&self) -> bool {
        self.runner
            .split_whitespace()
            .next()
            .is_some_and(|program| PACKAGE_MANAGERS.contains(&program))
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new(DEFAULT_RUNNER)
    }
}

impl CommandLookup for ScriptRunner {
    fn commands(&self) -> Vec<HookCommand> {
        DEFAULT_HOOKS
            .iter()
            .map(|hook| {
                let script = Self::script_name(hook);
                let command = format!("{} {script}", self.runner);
                if self.runs_package_scripts() {
                    HookCommand::with_script(*hook, command, script)
                } else {
                    HookCommand::new(*hook, command)
                }
            })
            .collect()
    }
}

impl CommandLookup for HookConfig {
    /// Use configured hook listing, or fall back to running package scripts
    /// through the configured runner.
    fn commands(&self) -> Vec<HookCommand> {
        match &self.hooks {
            Some(hooks) => hooks
                .iter()
                .map(|(hook, command)| HookCommand::new(hook, command))
                .collect(),
            None => ScriptRunner::new(&self.settings.runner).commands(),
        }
    }
}
