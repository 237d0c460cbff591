use crate::error::{ReleaseError, Result};
use crate::git::LocalRepository;
use std::collections::HashMap;

/// Mock working copy for testing without actual git operations
#[derive(Debug, Clone)]
pub struct MockRepository {
    is_repository: bool,
    dirty: Vec<String>,
    tag: Option<String>,
    config: HashMap<String, String>,
}

impl MockRepository {
    /// Create a clean repository with no tags
    pub fn new() -> Self {
        MockRepository {
            is_repository: true,
            dirty: Vec::new(),
            tag: None,
            config: HashMap::new(),
        }
    }

    /// A directory that is not a git repository
    pub fn outside() -> Self {
        MockRepository {
            is_repository: false,
            ..Self::new()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_dirty_path(mut self, path: impl Into<String>) -> Self {
        self.dirty.push(path.into());
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository for MockRepository {
    fn is_repository(&self) -> bool {
        self.is_repository
    }

    fn dirty_paths(&self) -> Result<Vec<String>> {
        if !self.is_repository {
            return Err(ReleaseError::NotInRepository);
        }
        Ok(self.dirty.clone())
    }

    fn latest_tag(&self) -> Result<String> {
        if !self.is_repository {
            return Err(ReleaseError::NotInRepository);
        }
        self.tag
            .clone()
            .ok_or_else(|| git2::Error::from_str("No names found, cannot describe anything.").into())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.config.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_tag() {
        let repo = MockRepository::new().with_tag("v1.0.0");
        assert_eq!(repo.latest_tag().unwrap(), "v1.0.0");
        assert!(MockRepository::new().latest_tag().is_err());
    }

    #[test]
    fn test_mock_repository_dirty() {
        let repo = MockRepository::new().with_dirty_path("Chart.yaml");
        assert_eq!(repo.dirty_paths().unwrap(), vec!["Chart.yaml".to_string()]);
    }

    #[test]
    fn test_mock_repository_outside() {
        let repo = MockRepository::outside().with_tag("v1.0.0");
        assert!(!repo.is_repository());
        assert!(matches!(
            repo.latest_tag(),
            Err(ReleaseError::NotInRepository)
        ));
    }

    #[test]
    fn test_mock_repository_config() {
        let repo = MockRepository::default().with_config("user.name", "Chart Bot");
        assert_eq!(
            repo.config_value("user.name").unwrap(),
            Some("Chart Bot".to_string())
        );
        assert_eq!(repo.config_value("user.email").unwrap(), None);
    }
}
