//! Version-control operations for publishing.
//!
//! `GitCli` shells out to the `git` binary. `TempRemote` owns a remote whose
//! URL embeds an access token and removes it again when dropped, so the
//! token never stays in `.git/config`.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Operations the publisher needs from a working tree
pub trait VersionControl {
    /// Initialize (or re-initialize) the working tree
    fn init(&self) -> Result<()>;
    fn stage_all(&self) -> Result<()>;
    fn commit(&self, message: &str) -> Result<()>;
    fn remotes(&self) -> Result<Vec<String>>;
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;
    fn remove_remote(&self, name: &str) -> Result<()>;
    /// Push `branch` to the same-named branch on `remote`
    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()>;
}

/// Author used for commits when git has no identity configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    /// GitHub's no-reply address for `username`
    pub fn noreply(username: &str) -> Self {
        Self {
            name: username.to_string(),
            email: format!("{}@users.noreply.github.com", username),
        }
    }
}

/// `git` command-line backend rooted at one working tree
pub struct GitCli {
    work_tree: PathBuf,
    fallback_identity: Option<CommitIdentity>,
    /// Extra environment for every git invocation; `None` unsets the variable
    env: Vec<(String, Option<String>)>,
}

impl GitCli {
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
            fallback_identity: None,
            env: Vec::new(),
        }
    }

    /// Commit as `identity` for whichever of user.name / user.email git
    /// cannot find in its configuration
    pub fn with_fallback_identity(mut self, identity: CommitIdentity) -> Self {
        self.fallback_identity = Some(identity);
        self
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    fn config_value(&self, key: &str) -> Option<String> {
        self.run("config", &["config", "--get", key])
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// `-c key=value` overrides for identity settings missing from git config
    fn identity_overrides(&self) -> Vec<String> {
        let Some(identity) = &self.fallback_identity else {
            return Vec::new();
        };

        let mut overrides = Vec::new();
        if self.config_value("user.name").is_none() {
            overrides.push("-c".to_string());
            overrides.push(format!("user.name={}", identity.name));
        }
        if self.config_value("user.email").is_none() {
            overrides.push("-c".to_string());
            overrides.push(format!("user.email={}", identity.email));
        }
        overrides
    }

    /// Run git in the working tree. Errors name the operation, never the
    /// arguments, since those may carry a credentialed URL.
    fn run(&self, operation: &str, args: &[&str]) -> Result<String> {
        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(&self.work_tree)
            // Fail instead of blocking on an interactive credential prompt
            .env("GIT_TERMINAL_PROMPT", "0");
        for (key, value) in &self.env {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }

        let output = command
            .output()
            .map_err(|e| anyhow!("Failed to run git {}: {}", operation, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(anyhow!("git {} failed: {}", operation, detail.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn init(&self) -> Result<()> {
        self.run("init", &["init"]).map(|_| ())
    }

    fn stage_all(&self) -> Result<()> {
        self.run("add", &["add", "-A"]).map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let overrides = self.identity_overrides();
        let mut args: Vec<&str> = overrides.iter().map(String::as_str).collect();
        args.extend(["commit", "-m", message]);
        self.run("commit", &args).map(|_| ())
    }

    fn remotes(&self) -> Result<Vec<String>> {
        let out = self.run("remote", &["remote"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run("remote add", &["remote", "add", name, url]).map(|_| ())
    }

    fn remove_remote(&self, name: &str) -> Result<()> {
        self.run("remote remove", &["remote", "remove", name]).map(|_| ())
    }

    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<()> {
        let refspec = format!("{branch}:{branch}");
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.push(remote);
        args.push(&refspec);
        self.run("push", &args).map(|_| ())
    }
}

/// A remote that exists only for the lifetime of this value.
///
/// Any remote already registered under the same name is replaced. Call
/// [`TempRemote::close`] to remove it and see whether removal worked; drop
/// removes it silently on any other exit path, including when `add` itself
/// fails part way.
pub struct TempRemote<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    name: String,
    closed: bool,
}

impl<'a, V: VersionControl + ?Sized> TempRemote<'a, V> {
    pub fn add(vcs: &'a V, name: &str, url: &str) -> Result<Self> {
        if vcs.remotes()?.iter().any(|r| r == name) {
            vcs.remove_remote(name)?;
        }

        let remote = Self {
            vcs,
            name: name.to_string(),
            closed: false,
        };
        vcs.add_remote(name, url)?;
        Ok(remote)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Force-push `branch` to the same branch on this remote
    pub fn push(&self, branch: &str) -> Result<()> {
        self.vcs.push(&self.name, branch, true)
    }

    /// Remove the remote, reporting failure
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.remove()
    }

    fn remove(&self) -> Result<()> {
        if self.vcs.remotes()?.iter().any(|r| r == &self.name) {
            self.vcs.remove_remote(&self.name)?;
        }
        Ok(())
    }
}

impl<V: VersionControl + ?Sized> Drop for TempRemote<'_, V> {
    fn drop(&mut self) {
        if !self.closed {
            // Nowhere to report from here; `close` is the checked path
            let _ = self.remove();
        }
    }
}
