//! Mock Research Service for testing.
//!
//! Provides a configurable in-memory implementation of the ResearchService
//! port, allowing tests to run without a live analysis backend.
//!
//! # Features
//!
//! - Queued submit outcomes (success body or error)
//! - Stored history, newest first, like the real service
//! - A gate that holds submits open until released, for single-flight tests
//! - Per-call history delays, to order overlapping refreshes
//! - Call tracking and a high-water mark of concurrent submits
//!
//! # Example
//!
//! ```ignore
//! let service = MockResearchService::new()
//!     .with_result("## Competitive Landscape")
//!     .with_error(RemoteError::rejected(400, Some("bad key".into())));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::domain::foundation::{ResearchId, Timestamp};
use crate::domain::research::{AnalysisResult, ProductIdea};
use crate::ports::{RemoteError, ResearchRequest, ResearchService};

/// Body returned when no outcome has been queued.
pub const DEFAULT_MOCK_BODY: &str = "## Competitive Landscape\n\n\
| Product | Core Features | Strengths | Weaknesses | Pricing |\n\
|---|---|---|---|---|\n\
| Product A | Feature 1, Feature 2 | Strong onboarding | Weak reporting | $10/user/month |\n\n\
## Strategic Opportunities & Differentiation\n\n\
- Serve an under-addressed niche\n";

/// A queued submit outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Succeed with this markdown body.
    Success { body: String },
    /// Fail with this error.
    Error(RemoteError),
}

/// Mock research service for testing.
#[derive(Debug, Clone, Default)]
pub struct MockResearchService {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    stored: Arc<Mutex<Vec<AnalysisResult>>>,
    history_error: Arc<Mutex<Option<RemoteError>>>,
    history_delays: Arc<Mutex<VecDeque<Duration>>>,
    available: Arc<AtomicBool>,
    gate: Option<Arc<Notify>>,
    submitted: Arc<Mutex<Vec<ProductIdea>>>,
    history_calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockResearchService {
    /// Creates a new mock service that is available and has no history.
    pub fn new() -> Self {
        let service = Self::default();
        service.available.store(true, Ordering::SeqCst);
        service
    }

    /// Queues a successful submit returning `body`.
    pub fn with_result(self, body: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Success { body: body.into() });
        self
    }

    /// Queues a failing submit.
    pub fn with_error(self, error: RemoteError) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Error(error));
        self
    }

    /// Seeds stored history (given newest first).
    pub fn with_history(self, entries: Vec<AnalysisResult>) -> Self {
        *self.stored.lock().unwrap() = entries;
        self
    }

    /// Makes every history fetch fail.
    pub fn with_history_error(self, error: RemoteError) -> Self {
        *self.history_error.lock().unwrap() = Some(error);
        self
    }

    /// Delays the response of the next history fetch by `delay`.
    ///
    /// The stored entries are read when the call arrives, so a delayed
    /// fetch answers with the history as it was at that moment.
    pub fn with_history_delay(self, delay: Duration) -> Self {
        self.history_delays.lock().unwrap().push_back(delay);
        self
    }

    /// Sets the health probe answer.
    pub fn with_availability(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Holds every submit open until [`release`](Self::release) is called.
    pub fn with_gate(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Lets one gated submit proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of submit calls received.
    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// Ideas received by submit, in call order.
    pub fn submitted_ideas(&self) -> Vec<ProductIdea> {
        self.submitted.lock().unwrap().clone()
    }

    /// Number of history fetches received.
    pub fn history_call_count(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    /// Highest number of submits observed running at the same time.
    pub fn max_concurrent_submits(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> MockOutcome {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Success {
                body: DEFAULT_MOCK_BODY.to_string(),
            })
    }
}

#[async_trait]
impl ResearchService for MockResearchService {
    async fn submit(&self, request: ResearchRequest) -> Result<AnalysisResult, RemoteError> {
        self.submitted
            .lock()
            .unwrap()
            .push(request.product_idea.clone());

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let outcome = match self.next_outcome() {
            MockOutcome::Success { body } => {
                let result = AnalysisResult::new(
                    ResearchId::new(Uuid::new_v4().to_string()),
                    Timestamp::now(),
                    request.product_idea,
                    body,
                );
                self.stored.lock().unwrap().insert(0, result.clone());
                Ok(result)
            }
            MockOutcome::Error(err) => Err(err),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn list_history(&self) -> Result<Vec<AnalysisResult>, RemoteError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.history_error.lock().unwrap().clone() {
            return Err(err);
        }
        let snapshot = self.stored.lock().unwrap().clone();
        let delay = self.history_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
