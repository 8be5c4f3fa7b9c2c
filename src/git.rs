//! Git subprocess gateway.
//!
//! The session talks to version control through the [`Gateway`] trait so
//! tests can substitute a scripted double. [`GitCli`] is the production
//! implementation: it shells out to the `git` binary and reports results
//! as explicit values rather than unwinding. A listing failure carries
//! the subprocess's combined output and exit code, and a checkout always
//! returns its output and code, zero or not, for the caller to forward.

use std::process::{Command, Output};

use color_print::cwrite;

use crate::styling::format_with_gutter;

/// Errors from gateway subprocess calls.
///
/// Display produces styled output for users; `main` extracts the exit code
/// via [`exit_code`].
#[derive(Debug)]
pub enum GitError {
    /// The `git` binary could not be started at all.
    Spawn { source: std::io::Error },
    /// `git branch` exited nonzero; carries its combined output, trimmed.
    ListFailed { output: String, code: i32 },
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::Spawn { source } => {
                cwrite!(f, "<red>Failed to run git: {}</>", source)
            }
            GitError::ListFailed { output, code } => {
                cwrite!(f, "<red>Listing branches failed (git exited with {})</>", code)?;
                if !output.is_empty() {
                    write!(f, "\n{}", format_with_gutter(output).trim_end())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GitError {}

/// Extract a process exit code from an error, if it is a [`GitError`].
pub fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<GitError>().map(|e| match e {
        GitError::Spawn { .. } => 1,
        GitError::ListFailed { code, .. } => *code,
    })
}

/// Result of a checkout: combined subprocess output plus its exit code.
///
/// Zero and nonzero codes both propagate verbatim to the session's exit
/// status, so this is not an error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutput {
    pub output: String,
    pub code: i32,
}

/// The two version-control operations the session needs.
pub trait Gateway {
    /// Run the branch listing, returning raw multi-line text.
    ///
    /// `include_remote = false` requests only local branches; `true`
    /// requests local and remote.
    fn list_branches(&self, include_remote: bool) -> Result<String, GitError>;

    /// Check out a branch by name.
    ///
    /// `Err` only when the subprocess cannot be spawned; a failing
    /// checkout is an `Ok` carrying the nonzero code.
    fn checkout(&self, branch: &str) -> Result<CheckoutOutput, GitError>;
}

/// Gateway backed by the real `git` binary on `PATH`.
pub struct GitCli;

fn branch_args(include_remote: bool) -> &'static [&'static str] {
    if include_remote {
        &["--no-pager", "branch", "--all", "--list", "--color=never"]
    } else {
        &["--no-pager", "branch", "--list", "--color=never"]
    }
}

fn run_git(args: &[&str]) -> Result<Output, GitError> {
    log::debug!("$ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .output()
        .map_err(|source| GitError::Spawn { source })
}

/// Combined stdout + stderr, trimmed.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.trim().to_string()
}

impl Gateway for GitCli {
    fn list_branches(&self, include_remote: bool) -> Result<String, GitError> {
        let output = run_git(branch_args(include_remote))?;

        if !output.status.success() {
            return Err(GitError::ListFailed {
                output: combined_output(&output),
                code: output.status.code().unwrap_or(1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn checkout(&self, branch: &str) -> Result<CheckoutOutput, GitError> {
        let output = run_git(&["checkout", branch])?;

        Ok(CheckoutOutput {
            output: combined_output(&output),
            code: output.status.code().unwrap_or(1),
        })
    }
}
