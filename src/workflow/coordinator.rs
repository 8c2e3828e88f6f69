// Workflow coordinator
//
// Owns the state manager and the backend, turns user actions into backend
// calls and feeds every response back through the state manager's guards.

use std::sync::Arc;
use std::time::Instant;

use crate::error::ReconError;
use crate::metrics::Metrics;
use crate::models::{
    CompareResult, DiscoveryOutcome, ProfilesMap, ResultFilter, SlotId, TableFile, ToleranceType,
    WorkflowState,
};
use crate::services::{BackendError, ProfileStore, ReconBackend};
use crate::state::{RunCompletion, RunStart, StateChange, StateManager};
use crate::workflow::results::ResultsView;

/// What a call to [`ReconWorkflow::run`] ended with, when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The result is stored in state
    Succeeded,
    /// A file was reselected while the request was in flight; the response was dropped
    Superseded,
    /// Another run was already in flight; nothing was submitted
    AlreadyRunning,
}

/// Coordinator for the reconciliation screen.
///
/// Every method converts backend failures into the matching [`ReconError`],
/// records them in [`WorkflowState`] next to the affected area, and also
/// returns them so a headless caller can react.
///
/// # Example
/// ```ignore
/// let workflow = ReconWorkflow::new(Arc::new(HttpBackend::new(&settings)?));
/// workflow.select_files(first, second).await;
/// workflow.set_match_keys(SlotId::First, vec!["ID".into()])?;
/// workflow.set_match_keys(SlotId::Second, vec!["ID".into()])?;
/// workflow.run().await?;
/// ```
#[derive(Clone)]
pub struct ReconWorkflow {
    state: Arc<StateManager>,
    backend: Arc<dyn ReconBackend>,
    profiles: ProfileStore,
    metrics: Arc<Metrics>,
}

impl ReconWorkflow {
    pub fn new(backend: Arc<dyn ReconBackend>) -> Self {
        Self::with_parts(
            Arc::new(StateManager::new()),
            backend,
            Arc::new(Metrics::new()),
        )
    }

    /// Build a coordinator around an existing state manager and metrics sink.
    pub fn with_parts(
        state: Arc<StateManager>,
        backend: Arc<dyn ReconBackend>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let profiles = ProfileStore::new(Arc::clone(&backend));
        Self {
            state,
            backend,
            profiles,
            metrics,
        }
    }

    pub fn state(&self) -> &Arc<StateManager> {
        &self.state
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn profile_store(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.state.snapshot()
    }

    fn track(&self, changes: Vec<StateChange>) {
        self.metrics.record_state_updates(changes.len());
    }

    // ===== File ingestion =====

    /// Select a file for a slot and discover its columns.
    ///
    /// When this makes both slots ready, the profile list is refreshed.
    /// A discovery response that arrives after the slot was reselected is
    /// dropped and reported as [`DiscoveryOutcome::Stale`].
    pub async fn select_file(
        &self,
        slot: SlotId,
        file: TableFile,
    ) -> Result<DiscoveryOutcome, ReconError> {
        tracing::info!("Discovering columns of {} file '{}'", slot, file.name());
        let (generation, changes) = self.state.select_file(slot, file.clone());
        self.track(changes);

        let response = self
            .backend
            .discover_columns(&file)
            .await
            .map_err(|e| ReconError::Discovery {
                slot,
                message: e.to_string(),
            });

        let (outcome, changes) = self.state.apply_discovery(slot, generation, response);
        self.track(changes);

        match outcome {
            DiscoveryOutcome::Ready => {
                self.metrics.record_discovery_succeeded();
                if self.state.read(|s| s.both_ready()) {
                    // Failure is recorded in state as the profile-list error
                    let _ = self.refresh_profiles().await;
                }
                Ok(outcome)
            }
            DiscoveryOutcome::Failed => {
                self.metrics.record_discovery_failed();
                let message = self
                    .state
                    .read(|s| s.slot(slot).error().map(str::to_string))
                    .unwrap_or_default();
                Err(ReconError::Discovery { slot, message })
            }
            DiscoveryOutcome::Stale => {
                self.metrics.record_stale_response();
                Ok(outcome)
            }
        }
    }

    /// Select both files; the two discovery calls run concurrently.
    pub async fn select_files(
        &self,
        first: TableFile,
        second: TableFile,
    ) -> (
        Result<DiscoveryOutcome, ReconError>,
        Result<DiscoveryOutcome, ReconError>,
    ) {
        tokio::join!(
            self.select_file(SlotId::First, first),
            self.select_file(SlotId::Second, second)
        )
    }

    // ===== Configuration =====

    pub fn set_match_keys(&self, slot: SlotId, keys: Vec<String>) -> Result<(), ReconError> {
        let changes = self.state.set_match_keys(slot, keys)?;
        self.track(changes);
        Ok(())
    }

    pub fn set_compare_column(&self, slot: SlotId, column: impl Into<String>) -> Result<(), ReconError> {
        let changes = self.state.set_compare_column(slot, column.into())?;
        self.track(changes);
        Ok(())
    }

    pub fn set_tolerance(&self, tolerance_type: ToleranceType, value: f64) -> Result<(), ReconError> {
        let changes = self.state.set_tolerance(tolerance_type, value)?;
        self.track(changes);
        Ok(())
    }

    // ===== Profiles =====

    /// Fetch the profile list into state and return how many profiles exist.
    pub async fn refresh_profiles(&self) -> Result<usize, ReconError> {
        let response = self.profiles.list().await;
        let result = response.as_ref().map(ProfilesMap::len).map_err(Clone::clone);
        if let Err(e) = &result {
            tracing::warn!("Could not fetch profiles: {}", e);
        }
        self.track(self.state.set_profiles(response));
        result
    }

    /// Apply a fetched profile by name.
    ///
    /// Names not present in the last fetched list are rejected.
    pub fn load_profile(&self, name: &str) -> Result<(), ReconError> {
        let profile = self
            .state
            .read(|s| s.profiles.as_ref().and_then(|p| p.get(name)).cloned())
            .ok_or_else(|| ReconError::Validation(format!("Profile '{name}' not found")))?;

        self.track(self.state.apply_profile(&profile));
        tracing::info!("Loaded profile '{}'", name);
        Ok(())
    }

    /// Save the current configuration under `name` and refresh the list.
    ///
    /// The configuration itself is never modified, whatever the outcome.
    pub async fn save_profile(&self, name: &str) -> Result<String, ReconError> {
        self.track(self.state.clear_profile_feedback());
        let payload = self.state.read(|s| s.config.to_request_payload());

        let result = self.profiles.save(name, &payload).await;
        self.track(self.state.record_profile_save(result.clone()));

        if result.is_ok() {
            let _ = self.refresh_profiles().await;
        }
        result
    }

    // ===== Run controller =====

    /// Submit a comparison of the two selected files.
    ///
    /// # Errors
    /// - [`ReconError::Precondition`] when the workflow is not runnable; the
    ///   backend is not contacted
    /// - [`ReconError::Transport`] when the backend could not be reached
    /// - [`ReconError::Run`] when the backend reported a failure
    pub async fn run(&self) -> Result<RunOutcome, ReconError> {
        let (start, changes) = self.state.begin_run()?;
        self.track(changes);

        let ticket = match start {
            RunStart::Submitted(ticket) => ticket,
            RunStart::AlreadyRunning => {
                tracing::debug!("Run requested while one is in flight; ignored");
                return Ok(RunOutcome::AlreadyRunning);
            }
        };

        tracing::info!(
            "Running comparison {} of '{}' against '{}'",
            ticket.run_id(),
            ticket.first().name(),
            ticket.second().name()
        );
        self.metrics.record_run_started();
        let started = Instant::now();

        let response = self
            .backend
            .compare(ticket.first(), ticket.second(), ticket.payload())
            .await
            .map_err(run_error)
            .and_then(CompareResult::try_from);

        self.metrics.record_run_time(started.elapsed());
        let error = response.as_ref().err().cloned();
        let (completion, changes) = self.state.finish_run(&ticket, response);
        self.track(changes);

        match (completion, error) {
            (RunCompletion::Failed, Some(error)) => {
                self.metrics.record_run_failed();
                tracing::warn!("Comparison {} failed: {}", ticket.run_id(), error);
                Err(error)
            }
            (RunCompletion::Stale, _) => {
                self.metrics.record_stale_response();
                Ok(RunOutcome::Superseded)
            }
            _ => {
                self.metrics.record_run_succeeded();
                tracing::info!("Comparison {} completed", ticket.run_id());
                Ok(RunOutcome::Succeeded)
            }
        }
    }

    // ===== Results =====

    /// Run `f` against the current results view, if a result exists.
    pub fn with_results<R>(&self, f: impl FnOnce(Option<ResultsView<'_>>) -> R) -> R {
        self.state
            .read(|s| f(s.result.as_deref().map(|r| ResultsView::new(r, s.filter))))
    }

    pub fn set_filter(&self, filter: ResultFilter) {
        self.track(self.state.set_filter(filter));
    }

    pub fn toggle_diffs_only(&self, enabled: bool) {
        self.track(self.state.toggle_diffs_only(enabled));
    }

    pub fn toggle_matches_only(&self, enabled: bool) {
        self.track(self.state.toggle_matches_only(enabled));
    }

    /// Fetch the downloadable artifact of the current result.
    pub async fn download(&self) -> Result<Vec<u8>, ReconError> {
        let token = self
            .state
            .read(|s| s.result.as_ref().map(|r| r.download_token().clone()))
            .ok_or_else(|| {
                ReconError::Precondition("no completed comparison to download".to_string())
            })?;

        let bytes = self
            .backend
            .download(&token)
            .await
            .map_err(|e| ReconError::Transport(e.to_string()))?;
        tracing::info!("Downloaded {} bytes of results", bytes.len());
        Ok(bytes)
    }

    /// Start over: files, configuration, run and results are cleared.
    pub fn reset(&self) {
        self.track(self.state.reset());
    }
}

fn run_error(error: BackendError) -> ReconError {
    if error.is_transport() {
        ReconError::Transport(error.to_string())
    } else {
        ReconError::Run(error.to_string())
    }
}
