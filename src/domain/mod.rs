//! Domain logic - pure version rules independent of git or remote operations

pub mod prerelease;
pub mod strategy;
pub mod version;

pub use prerelease::{Identifier, Prerelease};
pub use strategy::{PublishStrategy, UpdateStrategy};
pub use version::{DriftLevel, Version};
