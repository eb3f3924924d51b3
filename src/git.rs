// Version-control collaborator: drives the `git` binary to turn an
// extracted folder into a one-commit history and push it.

use crate::request::CommitIdentity;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors from running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` executable could not be started.
    #[error("could not run git {operation}: {source}")]
    Spawn {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// git ran and exited unsuccessfully.
    #[error("git {operation} failed: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
}

impl GitError {
    /// Replace every occurrence of each of `secrets` in the error text.
    pub fn redacted(self, secrets: &[&str]) -> Self {
        match self {
            GitError::Failed { operation, message } => GitError::Failed {
                operation,
                message: secrets
                    .iter()
                    .filter(|secret| !secret.is_empty())
                    .fold(message, |text, secret| text.replace(*secret, "***")),
            },
            other => other,
        }
    }
}

/// The version-control steps a publish needs, in the order it uses them.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Create a fresh repository in `dir`.
    fn init(&self, dir: &Path) -> Result<(), GitError>;

    /// Set the committer name and email for this repository only.
    fn configure_identity(&self, dir: &Path, identity: &CommitIdentity) -> Result<(), GitError>;

    /// Stage every file in the working tree.
    fn stage_all(&self, dir: &Path) -> Result<(), GitError>;

    /// Record the staged tree as a commit.
    fn commit(&self, dir: &Path, message: &str) -> Result<(), GitError>;

    /// Point `name` at `url`, adding the remote if it is not there yet.
    fn set_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), GitError>;

    /// Push the current commit to `refs/heads/<branch>` on `remote`.
    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), GitError>;
}

/// [`VersionControl`] backed by the system `git`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl VersionControl for GitCli {
    fn init(&self, dir: &Path) -> Result<(), GitError> {
        run_git(dir, &["init"], "init").map(drop)
    }

    fn configure_identity(&self, dir: &Path, identity: &CommitIdentity) -> Result<(), GitError> {
        run_git(dir, &["config", "user.name", &identity.name], "config")?;
        run_git(dir, &["config", "user.email", &identity.email], "config").map(drop)
    }

    fn stage_all(&self, dir: &Path) -> Result<(), GitError> {
        run_git(dir, &["add", "--all"], "add").map(drop)
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<(), GitError> {
        // An archive of empty folders still gets a commit to push.
        run_git(dir, &["commit", "--allow-empty", "-m", message], "commit").map(drop)
    }

    fn set_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), GitError> {
        let remotes = run_git(dir, &["remote"], "remote")?;
        if remotes.lines().any(|line| line.trim() == name) {
            run_git(dir, &["remote", "set-url", name, url], "remote set-url").map(drop)
        } else {
            run_git(dir, &["remote", "add", name, url], "remote add").map(drop)
        }
    }

    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        let refspec = format!("HEAD:refs/heads/{branch}");
        run_git(dir, &["push", remote, &refspec], "push").map(drop)
    }
}

/// Run git in `dir` and return its stdout.
///
/// Arguments are never logged since remote URLs carry credentials.
fn run_git(dir: &Path, args: &[&str], operation: &'static str) -> Result<String, GitError> {
    log::debug!("git {operation} in {}", dir.display());
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .output()
        .map_err(|source| GitError::Spawn { operation, source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::Failed {
            operation,
            message: stderr.trim().to_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
