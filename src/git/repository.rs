use crate::error::{ReleaseError, Result};
use git2::{DescribeFormatOptions, DescribeOptions, Repository as Git2Repo, StatusOptions};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface.
///
/// Opening never fails: outside a repository the wrapper simply reports
/// `is_repository() == false` and every other query returns
/// `NotInRepository`, so the setup stage can decide what to do about it.
pub struct Git2Repository {
    repo: Option<Git2Repo>,
}

impl Git2Repository {
    /// Discover the repository containing `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Self {
        let repo = match Git2Repo::discover(path.as_ref()) {
            Ok(repo) => Some(repo),
            Err(e) => {
                debug!(path = %path.as_ref().display(), error = %e, "no git repository found");
                None
            }
        };
        Git2Repository { repo }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo: Some(repo) }
    }

    fn repo(&self) -> Result<&Git2Repo> {
        self.repo.as_ref().ok_or(ReleaseError::NotInRepository)
    }
}

impl super::LocalRepository for Git2Repository {
    fn is_repository(&self) -> bool {
        self.repo.is_some()
    }

    fn dirty_paths(&self) -> Result<Vec<String>> {
        let repo = self.repo()?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().is_empty())
            .map(|entry| entry.path().unwrap_or("(non-utf8 path)").to_string())
            .collect())
    }

    fn latest_tag(&self) -> Result<String> {
        let repo = self.repo()?;

        let mut opts = DescribeOptions::new();
        opts.describe_tags();
        let describe = repo.describe(&opts)?;

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        Ok(describe.format(Some(&format))?)
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let config = match &self.repo {
            Some(repo) => repo.config()?,
            None => git2::Config::open_default()?,
        };

        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
