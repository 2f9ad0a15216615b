//! [`GitOperations`] backed by the system git binary.

use crate::error::{GitError, Result};
use crate::git::GitOperations;
use crate::git::branches::{format_tag, parse_remote_branches};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Git operations executed through the `git` executable
#[derive(Debug, Clone)]
pub struct SystemGit {
    git_binary: PathBuf,
    work_dir: PathBuf,
    remote: String,
}

impl SystemGit {
    /// Locate git on PATH and bind it to `work_dir` and `remote`
    pub fn new<P: AsRef<Path>>(work_dir: P, remote: impl Into<String>) -> Result<Self> {
        let git_binary = which::which("git").map_err(|e| GitError::GitNotFound {
            reason: e.to_string(),
        })?;

        Ok(Self {
            git_binary,
            work_dir: work_dir.as_ref().to_path_buf(),
            remote: remote.into(),
        })
    }

    /// Run git with `args`, returning trimmed stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        log::debug!("Running `{}` in {}", command, self.work_dir.display());

        let output = Command::new(&self.git_binary)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await
            .map_err(|e| GitError::CommandFailed {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(GitError::CommandFailed { command, reason }.into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitOperations for SystemGit {
    async fn is_repository(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"])
            .await
            .map(|out| out == "true")
            .unwrap_or(false)
    }

    async fn fetch_all(&self) -> Result<()> {
        self.run(&["fetch", "--all"]).await.map(|_| ())
    }

    async fn list_remote_branches(&self) -> Result<Vec<String>> {
        let output = self.run(&["branch", "-r"]).await?;
        Ok(parse_remote_branches(&output, &self.remote))
    }

    async fn create_branch(&self, name: &str, base: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(GitError::BranchNameRequired.into());
        }
        self.run(&["checkout", "-b", name, base]).await?;
        Ok(format!("Switched to a new branch '{}' based on '{}'", name, base))
    }

    async fn checkout_branch(&self, name: &str) -> Result<String> {
        self.run(&["checkout", name]).await?;
        Ok(format!("Switched to branch '{}'", name))
    }

    async fn merge_branch(&self, name: &str) -> Result<String> {
        let tracking = format!("{}/{}", self.remote, name);
        self.run(&["merge", "--no-edit", &tracking])
            .await
            .map_err(|e| GitError::MergeFailed {
                branch: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(name.to_string())
    }

    async fn push(&self, branch: &str) -> Result<String> {
        self.run(&["push", "--set-upstream", &self.remote, branch])
            .await
            .map_err(|e| {
                GitError::PushFailed {
                    reason: format!("branch '{}': {}", branch, e),
                }
                .into()
            })
    }

    async fn push_tags(&self) -> Result<String> {
        self.run(&["push", &self.remote, "--tags"]).await.map_err(|e| {
            GitError::PushFailed {
                reason: format!("tags: {}", e),
            }
            .into()
        })
    }

    async fn tag_version(&self, version: &str) -> Result<String> {
        let tag = format_tag(version);
        self.run(&["tag", "-a", &tag, "-m", &tag]).await?;
        Ok(tag)
    }

    async fn current_branch_name(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn remote_url(&self) -> Result<String> {
        let key = format!("remote.{}.url", self.remote);
        self.run(&["config", "--get", &key]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_in(dir: &Path, args: &[&str]) -> bool {
        std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_CEILING_DIRECTORIES", dir)
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_plain_directory_is_not_a_repository() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let Ok(git) = SystemGit::new(dir.path(), "origin") else {
            return;
        };
        assert!(!git.is_repository().await);
    }

    #[tokio::test]
    async fn test_branch_setup_in_fresh_repository() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let Ok(git) = SystemGit::new(dir.path(), "origin") else {
            return;
        };
        if !git_in(dir.path(), &["init", "-q", "-b", "master"])
            || !git_in(
                dir.path(),
                &[
                    "-c",
                    "user.name=release",
                    "-c",
                    "user.email=release@example.com",
                    "commit",
                    "-q",
                    "--allow-empty",
                    "-m",
                    "init",
                ],
            )
        {
            return;
        }

        assert!(git.is_repository().await);
        assert_eq!(git.current_branch_name().await.unwrap(), "master");

        git.create_branch("release/1.0", "master").await.unwrap();
        assert_eq!(git.current_branch_name().await.unwrap(), "release/1.0");

        let err = git.remote_url().await.unwrap_err();
        assert!(err.to_string().contains("remote.origin.url"));
    }
}
