//! Single-flight bookkeeping for the three user-triggered operations.
//!
//! Each [`Operation`] has its own flag. Beginning an operation that is
//! already in flight fails with [`WorkflowError::Busy`]; it is never queued.
//! Flags are independent, so an export may run while a publication is in
//! flight.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::WorkflowError;

/// A user-triggered operation with its own in-flight flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Analysis,
    Export,
    Publication,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Analysis => "analysis",
            Operation::Export => "export",
            Operation::Publication => "publication",
        };
        f.write_str(name)
    }
}

/// Observable state of one operation: idle, in flight, or settled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OperationStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    /// Settled with the message shown to the user.
    Failed(String),
}

impl OperationStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, OperationStatus::InFlight)
    }
}

/// Tracks the status of every operation.
///
/// Cloning shares the same flags.
#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    statuses: Arc<Mutex<HashMap<Operation, OperationStatus>>>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `op` in flight, or fails with `Busy` if it already is.
    pub fn try_begin(&self, op: Operation) -> Result<InFlightGuard, WorkflowError> {
        let mut statuses = self.lock();
        let status = statuses.entry(op).or_default();
        if status.is_in_flight() {
            tracing::debug!(operation = %op, "Rejected re-entrant operation");
            return Err(WorkflowError::Busy(op));
        }
        *status = OperationStatus::InFlight;
        Ok(InFlightGuard {
            tracker: self.clone(),
            op,
            settled: false,
        })
    }

    pub fn status(&self, op: Operation) -> OperationStatus {
        self.lock().get(&op).cloned().unwrap_or_default()
    }

    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.status(op).is_in_flight()
    }

    /// Returns every settled operation to `Idle`. In-flight flags are kept.
    pub fn clear_settled(&self) {
        for status in self.lock().values_mut() {
            if !status.is_in_flight() {
                *status = OperationStatus::Idle;
            }
        }
    }

    fn set(&self, op: Operation, status: OperationStatus) {
        self.lock().insert(op, status);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Operation, OperationStatus>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds an operation's in-flight flag until it settles.
///
/// Dropping an unsettled guard (e.g. the future was dropped) returns the
/// operation to `Idle`, so a flag can never stay stuck.
#[derive(Debug)]
#[must_use = "the operation is released as soon as the guard is dropped"]
pub struct InFlightGuard {
    tracker: OperationTracker,
    op: Operation,
    settled: bool,
}

impl InFlightGuard {
    pub fn operation(&self) -> Operation {
        self.op
    }

    pub fn succeed(mut self) {
        self.settled = true;
        self.tracker.set(self.op, OperationStatus::Succeeded);
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.settled = true;
        self.tracker
            .set(self.op, OperationStatus::Failed(message.into()));
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker.set(self.op, OperationStatus::Idle);
        }
    }
}
