//! Local working copy abstraction
//!
//! The update pipeline only needs a handful of read-only questions answered
//! about the repository it is run from: whether it is a repository at all,
//! whether it has uncommitted changes, the most recent tag, and the
//! configured committer identity.
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: canned answers for tests
//!
//! ```rust
//! # use chart_releaser::git::LocalRepository;
//! # fn example(repo: &dyn LocalRepository) -> chart_releaser::error::Result<()> {
//! if repo.is_repository() {
//!     let tag = repo.latest_tag()?;
//!     println!("releasing {}", tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Read-only view of the local git working copy
pub trait LocalRepository {
    /// Whether the working directory is inside a git repository
    fn is_repository(&self) -> bool;

    /// Paths with uncommitted changes, ignoring untracked files.
    ///
    /// An empty list means the working copy is clean.
    fn dirty_paths(&self) -> Result<Vec<String>>;

    /// Most recent tag reachable from HEAD.
    ///
    /// Equivalent to `git describe --tags --abbrev=0`; lightweight and
    /// annotated tags both count.
    fn latest_tag(&self) -> Result<String>;

    /// Look up a git config value such as `user.name`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - key is set
    /// * `Ok(None)` - key is not set in any config level
    fn config_value(&self, key: &str) -> Result<Option<String>>;
}
