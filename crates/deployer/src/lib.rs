// Publishing targets: GitHub repository + Pages, pushed through the git CLI

pub mod git;
pub mod github;
pub mod publisher;

use async_trait::async_trait;
use std::fmt;

pub use git::{CommitIdentity, GitCli, TempRemote, VersionControl};
pub use github::GitHubClient;
pub use publisher::{PUSH_FAILURE_HINT, PushAttempt, PushOutcome, PushReport, Publisher};

/// Username and access token entered at the prompt. Never written to disk.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    /// Returns `None` when either value is blank, which skips publishing.
    pub fn from_input(username: &str, token: &str) -> Option<Self> {
        let username = username.trim();
        let token = token.trim();
        if username.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            token: token.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Replace every occurrence of the token in `text`
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.token, "***")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"***")
            .finish()
    }
}

/// Result of the "create repository" call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Created,
    /// HTTP 422: the repository is already there, pushing can continue
    AlreadyExists,
    Unexpected { status: u16, body: String },
}

/// Result of the "enable static hosting" call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagesOutcome {
    Enabled,
    Unexpected { status: u16, body: String },
}

/// Remote repository hosting API. Transport failures surface as `Err`;
/// any HTTP response maps to an outcome.
#[async_trait]
pub trait HostingApi {
    async fn create_repository(&self, name: &str) -> anyhow::Result<RepoOutcome>;

    async fn enable_pages(
        &self,
        repository: &str,
        branch: &str,
        path: &str,
    ) -> anyhow::Result<PagesOutcome>;
}
