//! ResearchWorkspace - the application state of one research session.
//!
//! Owns the form being edited, the current result, the history cache and
//! the per-operation status flags, and drives the handlers. Every public
//! operation takes `&self`, so callers may invoke operations concurrently;
//! re-entering an operation that is already in flight fails with
//! [`WorkflowError::Busy`].
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`: inputs are snapshotted before a handler runs and results are
//! written back after it settles.

use chrono::{NaiveDate, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use super::handlers::{
    ExportDocumentCommand, ExportDocumentHandler, ExportReceipt, ExportSettings,
    PublishIssueCommand, PublishIssueHandler, RefreshHistoryHandler, SubmitResearchCommand,
    SubmitResearchHandler,
};
use super::{Notice, Operation, OperationStatus, OperationTracker, WorkflowError};
use crate::adapters::document::{HtmlSnapshotRasterizer, LocalArtifactStore, LopdfPageAssembler};
use crate::adapters::github::GitHubIssueTracker;
use crate::adapters::research::HttpResearchClient;
use crate::config::AppConfig;
use crate::domain::research::{AnalysisResult, HistoryCache, ProductIdeaDraft, ResearchForm};
use crate::ports::{
    ArtifactStore, CreatedIssue, DocumentRasterizer, ExportError, IssueTracker, PageAssembler,
    ResearchService,
};

/// The collaborators a workspace talks to.
#[derive(Clone)]
pub struct WorkspacePorts {
    pub research: Arc<dyn ResearchService>,
    pub tracker: Arc<dyn IssueTracker>,
    pub rasterizer: Arc<dyn DocumentRasterizer>,
    pub assembler: Arc<dyn PageAssembler>,
    pub store: Arc<dyn ArtifactStore>,
}

#[derive(Debug, Default)]
struct WorkspaceState {
    form: ResearchForm,
    current: Option<AnalysisResult>,
    history: HistoryCache,
    last_error: Option<String>,
    notice: Option<Notice>,
    /// Bumped by `reset`; a submit started before it does not write back.
    session: u64,
    /// Sequence number handed to the most recently started history fetch.
    refresh_started: u64,
    /// Sequence number of the fetch the history cache currently reflects.
    refresh_applied: u64,
}

/// Application state and orchestration for one research session.
pub struct ResearchWorkspace {
    state: Arc<Mutex<WorkspaceState>>,
    operations: OperationTracker,
    research: Arc<dyn ResearchService>,
    submit_handler: SubmitResearchHandler,
    history_handler: Arc<RefreshHistoryHandler>,
    export_handler: ExportDocumentHandler,
    publish_handler: PublishIssueHandler,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl ResearchWorkspace {
    pub fn new(ports: WorkspacePorts, export_settings: ExportSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkspaceState::default())),
            operations: OperationTracker::new(),
            research: Arc::clone(&ports.research),
            submit_handler: SubmitResearchHandler::new(Arc::clone(&ports.research)),
            history_handler: Arc::new(RefreshHistoryHandler::new(ports.research)),
            export_handler: ExportDocumentHandler::new(
                ports.rasterizer,
                ports.assembler,
                ports.store,
                export_settings,
            ),
            publish_handler: PublishIssueHandler::new(ports.tracker),
            refresh_task: Mutex::new(None),
        }
    }

    /// Wires the HTTP, GitHub and document adapters from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, WorkflowError> {
        let research = HttpResearchClient::new(config.research.client_config())?;
        let tracker = GitHubIssueTracker::new(config.tracker.github_config())?;
        let mut rasterizer = HtmlSnapshotRasterizer::new()
            .with_command(config.export.renderer_command.clone())
            .with_viewport_width(config.export.viewport_width_px);
        if let Some(timeout) = config.export.renderer_timeout() {
            rasterizer = rasterizer.with_timeout(timeout);
        }

        let ports = WorkspacePorts {
            research: Arc::new(research),
            tracker: Arc::new(tracker),
            rasterizer: Arc::new(rasterizer),
            assembler: Arc::new(LopdfPageAssembler::new()),
            store: Arc::new(LocalArtifactStore::new(config.export.output_dir.clone())),
        };
        Ok(Self::new(ports, config.export.settings()))
    }

    // ───────────────────────────────────────────────────────────────
    // Form editing
    // ───────────────────────────────────────────────────────────────

    pub fn set_title(&self, title: impl Into<String>) {
        self.state().form.idea.set_title(title);
    }

    pub fn set_target_user(&self, target_user: impl Into<String>) {
        self.state().form.idea.set_target_user(target_user);
    }

    /// Returns `false` if `index` is not an existing slot.
    pub fn set_feature_at(&self, index: usize, value: impl Into<String>) -> bool {
        self.state().form.idea.set_feature_at(index, value)
    }

    pub fn add_feature_slot(&self) {
        self.state().form.idea.add_feature_slot();
    }

    /// No-op (returns `false`) when it would remove the last slot.
    pub fn remove_feature_slot(&self, index: usize) -> bool {
        self.state().form.idea.remove_feature_slot(index)
    }

    pub fn set_analysis_key(&self, key: impl Into<String>) {
        self.state().form.credentials.set_analysis_key(key);
    }

    pub fn set_tracker_token(&self, token: impl Into<String>) {
        self.state().form.credentials.set_tracker_token(token);
    }

    pub fn set_tracker_repository(&self, repository: impl Into<String>) {
        self.state().form.credentials.set_tracker_repository(repository);
    }

    /// Snapshot of the idea being edited.
    pub fn draft(&self) -> ProductIdeaDraft {
        self.state().form.idea.clone()
    }

    pub fn tracker_repository(&self) -> String {
        self.state().form.credentials.tracker_repository().to_string()
    }

    pub fn has_analysis_key(&self) -> bool {
        self.state().form.credentials.analysis_key().is_some()
    }

    pub fn has_tracker_token(&self) -> bool {
        self.state().form.credentials.tracker_token().is_some()
    }

    // ───────────────────────────────────────────────────────────────
    // Analysis
    // ───────────────────────────────────────────────────────────────

    /// Submits the current draft for analysis.
    ///
    /// On success the result becomes current and a best-effort history
    /// refresh is started in the background. On failure the previous
    /// result stays current.
    pub async fn submit(&self) -> Result<AnalysisResult, WorkflowError> {
        let guard = self.operations.try_begin(Operation::Analysis)?;

        let (cmd, session) = {
            let mut state = self.state();
            state.last_error = None;
            let cmd = SubmitResearchCommand {
                idea: state.form.idea.to_product_idea(),
                analysis_key: state.form.credentials.analysis_key_copy(),
            };
            (cmd, state.session)
        };

        match self.submit_handler.handle(cmd).await {
            Ok(result) => {
                {
                    let mut state = self.state();
                    if state.session == session {
                        state.current = Some(result.clone());
                    } else {
                        tracing::debug!(
                            research_id = %result.id(),
                            "Workspace was reset during analysis; result not loaded"
                        );
                    }
                }
                guard.succeed();
                self.spawn_history_refresh();
                Ok(result)
            }
            Err(err) => {
                let message = err.user_message();
                {
                    let mut state = self.state();
                    if state.session == session {
                        state.last_error = Some(message.clone());
                    }
                }
                guard.fail(message);
                Err(err)
            }
        }
    }

    pub fn current_result(&self) -> Option<AnalysisResult> {
        self.state().current.clone()
    }

    // ───────────────────────────────────────────────────────────────
    // History
    // ───────────────────────────────────────────────────────────────

    /// Fetches recent analyses and returns the cached list.
    ///
    /// Failures are logged and swallowed; the cache keeps its last value.
    /// When fetches overlap, the one started last wins.
    pub async fn refresh_history(&self) -> Vec<AnalysisResult> {
        refresh_into(&self.history_handler, &self.state).await;
        self.history()
    }

    pub fn history(&self) -> Vec<AnalysisResult> {
        self.state().history.entries().to_vec()
    }

    /// Makes `entry` the current result and loads its idea into the form.
    ///
    /// Purely local: no network call, the cache itself is untouched.
    pub fn load_history_entry(&self, entry: &AnalysisResult) {
        let mut state = self.state();
        state.form.idea = ProductIdeaDraft::from_idea(entry.product_idea());
        state.current = Some(entry.clone());
        tracing::debug!(research_id = %entry.id(), "Loaded analysis from history");
    }

    /// Loads the cached entry at `index`. Returns `false` if there is none.
    pub fn load_history_at(&self, index: usize) -> bool {
        let entry = self.state().history.get(index).cloned();
        match entry {
            Some(entry) => {
                self.load_history_entry(&entry);
                true
            }
            None => false,
        }
    }

    /// Waits for the most recently started background refresh, if any.
    pub async fn wait_for_history_refresh(&self) {
        let task = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "History refresh task did not complete");
            }
        }
    }

    fn spawn_history_refresh(&self) {
        let handler = Arc::clone(&self.history_handler);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            refresh_into(&handler, &state).await;
        });
        *self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);
    }

    // ───────────────────────────────────────────────────────────────
    // Export
    // ───────────────────────────────────────────────────────────────

    /// Exports the current result as a paginated PDF.
    pub async fn export_pdf(&self) -> Result<ExportReceipt, WorkflowError> {
        let guard = self.operations.try_begin(Operation::Export)?;
        let outcome = match self.export_command() {
            Ok(cmd) => self.export_handler.handle(cmd).await.map_err(WorkflowError::from),
            Err(err) => Err(err),
        };
        self.settle(guard, outcome, |receipt| {
            Notice::export(format!("PDF saved as {}", receipt.filename))
        })
    }

    /// Saves the current result's markdown body.
    pub async fn export_markdown(&self) -> Result<ExportReceipt, WorkflowError> {
        let guard = self.operations.try_begin(Operation::Export)?;
        let outcome = match self.export_command() {
            Ok(cmd) => self
                .export_handler
                .handle_markdown(cmd)
                .await
                .map_err(WorkflowError::from),
            Err(err) => Err(err),
        };
        self.settle(guard, outcome, |receipt| {
            Notice::export(format!("Markdown saved as {}", receipt.filename))
        })
    }

    fn export_command(&self) -> Result<ExportDocumentCommand, WorkflowError> {
        let document = self
            .current_result()
            .ok_or(WorkflowError::Export(ExportError::MissingDocument))?;
        Ok(ExportDocumentCommand {
            document,
            date: today(),
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Publication
    // ───────────────────────────────────────────────────────────────

    /// Publishes the current result as an issue in the configured repository.
    pub async fn publish_issue(&self) -> Result<CreatedIssue, WorkflowError> {
        let guard = self.operations.try_begin(Operation::Publication)?;

        let cmd = {
            let state = self.state();
            PublishIssueCommand {
                document: state.current.clone(),
                token: state.form.credentials.tracker_token_copy(),
                repository: state.form.credentials.tracker_repository().to_string(),
                date: today(),
            }
        };

        let outcome = self
            .publish_handler
            .handle(cmd)
            .await
            .map_err(WorkflowError::from);
        self.settle(guard, outcome, |issue| {
            Notice::publication(format!("GitHub issue #{} created successfully!", issue.number))
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Status
    // ───────────────────────────────────────────────────────────────

    pub fn status(&self, op: Operation) -> OperationStatus {
        self.operations.status(op)
    }

    /// Message of the most recent failure, until the next submit or reset.
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn dismiss_error(&self) {
        self.state().last_error = None;
    }

    /// The current confirmation, if it has not expired yet.
    pub fn notice(&self) -> Option<Notice> {
        let mut state = self.state();
        if state.notice.as_ref().is_some_and(Notice::is_expired) {
            state.notice = None;
        }
        state.notice.clone()
    }

    /// Probes the research service.
    pub async fn service_available(&self) -> bool {
        self.research.is_available().await
    }

    /// Clears the form, credentials, current result, messages and settled
    /// statuses. History is kept; the service owns it.
    pub fn reset(&self) {
        let mut state = self.state();
        state.form.reset();
        state.current = None;
        state.last_error = None;
        state.notice = None;
        state.session += 1;
        self.operations.clear_settled();
    }

    // ───────────────────────────────────────────────────────────────
    // Internals
    // ───────────────────────────────────────────────────────────────

    fn state(&self) -> MutexGuard<'_, WorkspaceState> {
        lock_state(&self.state)
    }

    fn record_error(&self, err: &WorkflowError) -> String {
        let message = err.user_message();
        self.state().last_error = Some(message.clone());
        message
    }

    fn settle<T>(
        &self,
        guard: super::InFlightGuard,
        outcome: Result<T, WorkflowError>,
        notice: impl FnOnce(&T) -> Notice,
    ) -> Result<T, WorkflowError> {
        match outcome {
            Ok(value) => {
                self.state().notice = Some(notice(&value));
                guard.succeed();
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(operation = %guard.operation(), error = %err, "Operation failed");
                guard.fail(self.record_error(&err));
                Err(err)
            }
        }
    }
}

async fn refresh_into(handler: &RefreshHistoryHandler, state: &Mutex<WorkspaceState>) {
    let sequence = {
        let mut state = lock_state(state);
        state.refresh_started += 1;
        state.refresh_started
    };

    match handler.handle().await {
        Ok(entries) => {
            let mut state = lock_state(state);
            if sequence > state.refresh_applied {
                state.refresh_applied = sequence;
                state.history.replace(entries);
            } else {
                tracing::debug!(sequence, "Discarding history from an outdated refresh");
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "History refresh failed; keeping cached entries");
        }
    }
}

fn lock_state(state: &Mutex<WorkspaceState>) -> MutexGuard<'_, WorkspaceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
