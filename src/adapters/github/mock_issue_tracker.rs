//! Mock Issue Tracker for testing.
//!
//! Records every create call and answers with sequential issue numbers or
//! a queued error. A gate can hold calls open until released.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::publication::{IssueDraft, RepositoryRef};
use crate::ports::{CreatedIssue, IssueTracker, PublicationError};

/// A create-issue call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedIssue {
    pub repository: String,
    pub token: String,
    pub draft: IssueDraft,
}

/// Mock issue tracker for testing.
#[derive(Debug, Clone)]
pub struct MockIssueTracker {
    next_number: Arc<Mutex<u64>>,
    errors: Arc<Mutex<VecDeque<PublicationError>>>,
    calls: Arc<Mutex<Vec<RecordedIssue>>>,
    gate: Option<Arc<Notify>>,
}

impl Default for MockIssueTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIssueTracker {
    /// Creates a tracker that numbers issues from 1.
    pub fn new() -> Self {
        Self {
            next_number: Arc::new(Mutex::new(1)),
            errors: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Starts numbering from `number`.
    pub fn with_next_number(self, number: u64) -> Self {
        *self.next_number.lock().unwrap() = number;
        self
    }

    /// Queues an error for the next call.
    pub fn with_error(self, error: PublicationError) -> Self {
        self.errors.lock().unwrap().push_back(error);
        self
    }

    /// Holds every call open until [`release`](Self::release) is called.
    pub fn with_gate(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Lets one gated call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of create calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls.
    pub fn get_calls(&self) -> Vec<RecordedIssue> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTracker for MockIssueTracker {
    async fn create_issue(
        &self,
        repository: &RepositoryRef,
        token: &SecretString,
        draft: &IssueDraft,
    ) -> Result<CreatedIssue, PublicationError> {
        self.calls.lock().unwrap().push(RecordedIssue {
            repository: repository.to_string(),
            token: token.expose_secret().clone(),
            draft: draft.clone(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(err) = self.errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        let mut next = self.next_number.lock().unwrap();
        let number = *next;
        *next += 1;

        Ok(CreatedIssue {
            number,
            html_url: Some(format!("https://github.com/{}/issues/{}", repository, number)),
        })
    }
}
