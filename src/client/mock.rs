use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::client::{ClientOptions, RepositoryClient};
use crate::error::{ReleaseError, Result};

/// A call recorded by [MockClient]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetFile {
        path: String,
    },
    UpdateFile {
        path: String,
        message: String,
        contents: String,
        git_ref: String,
    },
    CreateRef {
        git_ref: String,
        base: String,
    },
    CreatePullRequest {
        title: String,
        body: String,
        git_ref: String,
        base: String,
    },
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    GetFile,
    UpdateFile,
    CreateRef,
    CreatePullRequest,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<String, String>,
    failing: HashSet<MockOperation>,
    calls: Vec<MockCall>,
}

/// In-memory repository client for tests.
///
/// Clones share state, so a test can keep one handle while the pipeline
/// owns another and inspect the recorded calls afterwards.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Rc<RefCell<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file served by `get_file`
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .files
            .insert(path.into(), contents.into());
        self
    }

    /// Make every call of `op` fail
    pub fn failing(self, op: MockOperation) -> Self {
        self.state.borrow_mut().failing.insert(op);
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.borrow().calls.clone()
    }

    /// Current contents of a file, including updates
    pub fn file(&self, path: &str) -> Option<String> {
        self.state.borrow().files.get(path).cloned()
    }

    fn record(&self, op: MockOperation, call: MockCall) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(ReleaseError::client(format!("mock {:?} failure", op)));
        }
        Ok(())
    }
}

impl RepositoryClient for MockClient {
    fn get_file(&self, _opts: &ClientOptions, path: &str) -> Result<String> {
        self.record(
            MockOperation::GetFile,
            MockCall::GetFile {
                path: path.to_string(),
            },
        )?;
        self.file(path)
            .ok_or_else(|| ReleaseError::FileNotFound(path.to_string()))
    }

    fn update_file(
        &self,
        opts: &ClientOptions,
        path: &str,
        message: &str,
        contents: &[u8],
    ) -> Result<()> {
        let contents = String::from_utf8_lossy(contents).to_string();
        self.record(
            MockOperation::UpdateFile,
            MockCall::UpdateFile {
                path: path.to_string(),
                message: message.to_string(),
                contents: contents.clone(),
                git_ref: opts.normalized().git_ref,
            },
        )?;

        let mut state = self.state.borrow_mut();
        match state.files.get_mut(path) {
            Some(existing) => {
                *existing = contents;
                Ok(())
            }
            None => Err(ReleaseError::FileNotFound(path.to_string())),
        }
    }

    fn create_ref(&self, opts: &ClientOptions) -> Result<()> {
        let opts = opts.normalized();
        self.record(
            MockOperation::CreateRef,
            MockCall::CreateRef {
                git_ref: opts.git_ref,
                base: opts.base,
            },
        )
    }

    fn create_pull_request(&self, opts: &ClientOptions, title: &str, body: &str) -> Result<()> {
        let opts = opts.normalized();
        if opts.git_ref == opts.base {
            return Err(ReleaseError::client(
                "cannot create pull request, ref and base are the same",
            ));
        }
        self.record(
            MockOperation::CreatePullRequest,
            MockCall::CreatePullRequest {
                title: title.to_string(),
                body: body.to_string(),
                git_ref: opts.git_ref,
                base: opts.base,
            },
        )
    }
}
