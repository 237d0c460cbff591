//! Remote chart repository access
//!
//! The pipeline reads and writes chart files through the [RepositoryClient]
//! trait so that stages never talk to a hosting service directly.
//!
//! - [github::GitHubClient]: GitHub REST API over blocking HTTP
//! - [mock::MockClient]: in-memory client that records every call

pub mod github;
pub mod mock;

pub use github::GitHubClient;
pub use mock::{MockCall, MockClient, MockOperation};

use crate::error::Result;

const HEADS_PREFIX: &str = "refs/heads/";

/// Per-call state needed to address the chart repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Branch that receives the changes
    pub git_ref: String,
    /// Branch the changes are based on
    pub base: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub author_name: String,
    pub author_email: String,
}

impl ClientOptions {
    /// Options addressing only the repository, used for plain reads
    pub fn for_repository(owner: impl Into<String>, name: impl Into<String>) -> Self {
        ClientOptions {
            repo_owner: owner.into(),
            repo_name: name.into(),
            ..Default::default()
        }
    }

    /// Copy with both refs in fully qualified `refs/heads/...` form
    pub fn normalized(&self) -> Self {
        ClientOptions {
            git_ref: qualify_ref(&self.git_ref),
            base: qualify_ref(&self.base),
            ..self.clone()
        }
    }
}

/// Prefix a branch name with `refs/heads/` unless it already has it.
/// An empty name stays empty.
pub fn qualify_ref(name: &str) -> String {
    if name.is_empty() || name.starts_with(HEADS_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", HEADS_PREFIX, name)
    }
}

/// Strip `refs/heads/` from a qualified ref
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.strip_prefix(HEADS_PREFIX).unwrap_or(git_ref)
}

/// Operations the update pipeline needs from a hosted repository
pub trait RepositoryClient {
    /// Fetch the text contents of `path`.
    ///
    /// Reads from `opts.base` when set, otherwise from the default branch.
    /// A missing file fails with `ReleaseError::FileNotFound`.
    fn get_file(&self, opts: &ClientOptions, path: &str) -> Result<String>;

    /// Replace the contents of an existing file on `opts.git_ref`.
    ///
    /// Files are never created; a missing file fails with
    /// `ReleaseError::FileNotFound`.
    fn update_file(
        &self,
        opts: &ClientOptions,
        path: &str,
        message: &str,
        contents: &[u8],
    ) -> Result<()>;

    /// Create `opts.git_ref` pointing at the head of `opts.base`.
    fn create_ref(&self, opts: &ClientOptions) -> Result<()>;

    /// Open a pull request merging `opts.git_ref` into `opts.base`.
    fn create_pull_request(&self, opts: &ClientOptions, title: &str, body: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_ref() {
        assert_eq!(qualify_ref("main"), "refs/heads/main");
        assert_eq!(qualify_ref("refs/heads/main"), "refs/heads/main");
        assert_eq!(qualify_ref("chartreleaser/x/1.0.0"), "refs/heads/chartreleaser/x/1.0.0");
        assert_eq!(qualify_ref(""), "");
    }

    #[test]
    fn test_branch_name() {
        assert_eq!(branch_name("refs/heads/main"), "main");
        assert_eq!(branch_name("main"), "main");
    }

    #[test]
    fn test_normalized_options() {
        let opts = ClientOptions {
            git_ref: "feature".to_string(),
            base: "refs/heads/master".to_string(),
            ..ClientOptions::for_repository("owner", "charts")
        };
        let normalized = opts.normalized();
        assert_eq!(normalized.git_ref, "refs/heads/feature");
        assert_eq!(normalized.base, "refs/heads/master");
        assert_eq!(normalized.repo_owner, "owner");
        assert_eq!(normalized.repo_name, "charts");
    }
}
