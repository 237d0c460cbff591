pub mod analyzer;
pub mod cli;
pub mod client;
pub mod collector;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod templates;
pub mod ui;

pub use error::{ReleaseError, Result};
