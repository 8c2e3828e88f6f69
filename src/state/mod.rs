// State management module
//
// This module provides the StateManager which wraps WorkflowState with thread-safe access
// using Arc<RwLock<T>> and emits change events so views can re-render.

use crate::error::ReconError;
use crate::models::{
    ComparePayload, CompareResult, DiscoveryOutcome, ProfilesMap, ResultFilter, RunStatus,
    SlotId, SlotStatus, TableFile, ToleranceType, WorkflowState,
};
use std::convert::Infallible;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events are emitted to notify interested parties (views, the CLI
/// progress output) about state changes without requiring them to poll.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A file slot changed status, file or columns
    SlotChanged {
        slot: SlotId,
        status: SlotStatus,
        columns: usize,
    },

    /// Match keys, compare columns, tolerance or runnability changed
    ConfigurationChanged { is_runnable: bool },

    /// A comparison request was submitted
    RunStarted { run_id: u64 },

    /// The run left the `Running` state, or was reset
    RunFinished {
        status: RunStatus,
        error: Option<String>,
    },

    /// A result was stored or discarded
    ResultChanged { has_result: bool },

    /// Result filter toggles changed
    FilterChanged { diffs_only: bool, matches_only: bool },

    /// The profile list or its error changed; `count` is `None` while unknown
    ProfilesChanged {
        count: Option<usize>,
        error: Option<String>,
    },

    /// Feedback from the last profile save changed
    ProfileSaveChanged {
        message: Option<String>,
        error: Option<String>,
    },

    /// State has been reset
    StateReset,
}

/// Proof of a submitted run, needed to apply its response.
///
/// Carries the files and configuration captured at submission time so the
/// request is built from a consistent snapshot.
#[derive(Clone, Debug)]
pub struct RunTicket {
    run_id: u64,
    first: TableFile,
    second: TableFile,
    payload: ComparePayload,
}

impl RunTicket {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn first(&self) -> &TableFile {
        &self.first
    }

    pub fn second(&self) -> &TableFile {
        &self.second
    }

    pub fn payload(&self) -> &ComparePayload {
        &self.payload
    }
}

/// Result of asking the run controller to start.
#[derive(Clone, Debug)]
pub enum RunStart {
    Submitted(RunTicket),
    /// A run is already in flight; nothing was done
    AlreadyRunning,
}

/// What happened when a run response was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunCompletion {
    Succeeded,
    Failed,
    /// The run was superseded (file reselected or state reset); response dropped
    Stale,
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`WorkflowState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Implements every transition of the file slots, configuration, run and results
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// Always use `StateManager` instead of mutating [`WorkflowState`] directly:
/// - [`read()`](Self::read) for reading state
/// - the transition methods ([`select_file()`](Self::select_file),
///   [`begin_run()`](Self::begin_run), ...) for mutations
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// # Related Types
///
/// - [`crate::models::WorkflowState`]: The underlying state structure
/// - [`StateChange`]: Event types emitted on state mutations
/// - [`crate::workflow::ReconWorkflow`]: Issues backend calls and feeds responses back here
pub struct StateManager {
    /// The workflow state protected by RwLock for thread-safe access
    state: Arc<RwLock<WorkflowState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(WorkflowState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    ///
    /// Results are shared behind an `Arc`, so this stays cheap for large runs.
    pub fn snapshot(&self) -> WorkflowState {
        self.read(WorkflowState::clone)
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let runnable = state_manager.read(|state| state.is_runnable());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&WorkflowState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut WorkflowState),
    {
        match self.try_update(|state| {
            update_fn(state);
            Ok::<(), Infallible>(())
        }) {
            Ok(((), changes)) => changes,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`update()`](Self::update).
    ///
    /// If the closure returns an error the state is restored to what it was
    /// before the call and no events are emitted.
    pub fn try_update<F, T, E>(&self, update_fn: F) -> Result<(T, Vec<StateChange>), E>
    where
        F: FnOnce(&mut WorkflowState) -> Result<T, E>,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        let value = match update_fn(&mut state) {
            Ok(value) => value,
            Err(error) => {
                *state = old_state;
                return Err(error);
            }
        };

        let changes = Self::detect_changes(&old_state, &state);
        drop(state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        Ok((value, changes))
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Detect what changed between two states and generate events
    fn detect_changes(old: &WorkflowState, new: &WorkflowState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        for id in SlotId::ALL {
            let (before, after) = (old.slot(id), new.slot(id));
            if before.status() != after.status()
                || before.generation() != after.generation()
                || before.columns() != after.columns()
            {
                changes.push(StateChange::SlotChanged {
                    slot: id,
                    status: after.status(),
                    columns: after.columns().len(),
                });
            }
        }

        if old.config != new.config || old.is_runnable() != new.is_runnable() {
            changes.push(StateChange::ConfigurationChanged {
                is_runnable: new.is_runnable(),
            });
        }

        if old.run_status != new.run_status || old.run_id != new.run_id {
            if new.run_status == RunStatus::Running {
                changes.push(StateChange::RunStarted { run_id: new.run_id });
            } else if old.run_status != new.run_status {
                changes.push(StateChange::RunFinished {
                    status: new.run_status,
                    error: new.run_error.clone(),
                });
            }
        }

        let same_result = match (&old.result, &new.result) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same_result {
            changes.push(StateChange::ResultChanged {
                has_result: new.result.is_some(),
            });
        }

        if old.filter != new.filter {
            changes.push(StateChange::FilterChanged {
                diffs_only: new.filter.diffs_only,
                matches_only: new.filter.matches_only,
            });
        }

        if old.profiles != new.profiles || old.profiles_error != new.profiles_error {
            changes.push(StateChange::ProfilesChanged {
                count: new.profiles.as_ref().map(|p| p.len()),
                error: new.profiles_error.clone(),
            });
        }

        if old.save_message != new.save_message || old.save_error != new.save_error {
            changes.push(StateChange::ProfileSaveChanged {
                message: new.save_message.clone(),
                error: new.save_error.clone(),
            });
        }

        changes
    }

    // ===== File ingestion =====

    /// Put a newly selected file into a slot and enter `Discovering`.
    ///
    /// The previous result is discarded. A run in flight is superseded: its
    /// response will be dropped and the run controller returns to `NotStarted`.
    ///
    /// # Returns
    /// The generation the discovery response must be applied with, and the emitted events
    pub fn select_file(&self, slot: SlotId, file: TableFile) -> (u64, Vec<StateChange>) {
        let name = file.name().to_string();
        let mut generation = 0;
        let changes = self.update(|state| {
            generation = state.slot_mut(slot).select(file);
            state.clear_result();
            if state.is_running() {
                tracing::warn!("{} file reselected during a run; its result will be ignored", slot);
                state.run_id += 1;
                state.run_status = RunStatus::NotStarted;
            }
            state.run_error = None;
        });
        tracing::debug!("Selected {} file '{}' (generation {})", slot, name, generation);
        (generation, changes)
    }

    /// Apply the response of a discovery call.
    ///
    /// On success the configuration is brought in line with the new columns
    /// (vanished keys dropped, compare column initialised if needed). Responses
    /// for a superseded selection are ignored.
    pub fn apply_discovery(
        &self,
        slot: SlotId,
        generation: u64,
        response: Result<Vec<String>, ReconError>,
    ) -> (DiscoveryOutcome, Vec<StateChange>) {
        let mut outcome = DiscoveryOutcome::Stale;
        let changes = self.update(|state| {
            outcome = match response {
                Ok(columns) => state.slot_mut(slot).apply_columns(generation, columns),
                Err(error) => state.slot_mut(slot).apply_failure(generation, error.message()),
            };
            if outcome == DiscoveryOutcome::Ready {
                let columns = state.slot(slot).columns().to_vec();
                state.config.sync_with_columns(slot, &columns);
            }
        });

        match outcome {
            DiscoveryOutcome::Ready => tracing::info!("{} file columns discovered", slot),
            DiscoveryOutcome::Failed => tracing::warn!("{} file column discovery failed", slot),
            DiscoveryOutcome::Stale => {
                tracing::debug!("Dropped stale discovery response for {} file", slot)
            }
        }
        (outcome, changes)
    }

    // ===== Comparison configuration =====

    pub fn set_match_keys(
        &self,
        slot: SlotId,
        keys: Vec<String>,
    ) -> Result<Vec<StateChange>, ReconError> {
        self.try_update(|state| {
            let available = state.slot(slot).columns().to_vec();
            state.config.set_match_keys(slot, keys, &available)
        })
        .map(|((), changes)| changes)
    }

    pub fn set_compare_column(
        &self,
        slot: SlotId,
        column: String,
    ) -> Result<Vec<StateChange>, ReconError> {
        self.try_update(|state| {
            let available = state.slot(slot).columns().to_vec();
            state.config.set_compare_column(slot, column, &available)
        })
        .map(|((), changes)| changes)
    }

    pub fn set_tolerance(
        &self,
        tolerance_type: ToleranceType,
        value: f64,
    ) -> Result<Vec<StateChange>, ReconError> {
        self.try_update(|state| state.config.set_tolerance(tolerance_type, value))
            .map(|((), changes)| changes)
    }

    /// Copy a profile into the configuration, dropping columns the current files lack.
    pub fn apply_profile(&self, profile: &ComparePayload) -> Vec<StateChange> {
        self.update(|state| {
            let first = state.first.columns().to_vec();
            let second = state.second.columns().to_vec();
            state.config.apply_profile(profile, &first, &second);
        })
    }

    // ===== Run controller =====

    /// Try to move the run controller into `Running`.
    ///
    /// A call while a run is in flight is a no-op. Otherwise the workflow must
    /// be runnable, or [`ReconError::Precondition`] is returned and nothing
    /// changes. On submission any prior result and filter state is cleared.
    pub fn begin_run(&self) -> Result<(RunStart, Vec<StateChange>), ReconError> {
        self.try_update(|state| {
            if state.is_running() {
                return Ok(RunStart::AlreadyRunning);
            }
            if !state.is_runnable() {
                return Err(ReconError::Precondition(
                    state.runnability_problems().join(", "),
                ));
            }
            let (Some(first), Some(second)) = (state.first.file(), state.second.file()) else {
                return Err(ReconError::Precondition("input files missing".to_string()));
            };
            let ticket = RunTicket {
                run_id: state.run_id + 1,
                first: first.clone(),
                second: second.clone(),
                payload: state.config.to_request_payload(),
            };

            state.run_id = ticket.run_id;
            state.run_status = RunStatus::Running;
            state.run_error = None;
            state.clear_result();
            Ok(RunStart::Submitted(ticket))
        })
    }

    /// Apply the response of a submitted run.
    ///
    /// Success stores the new result and resets the filter toggles. Failure
    /// stores the message and leaves no result behind.
    pub fn finish_run(
        &self,
        ticket: &RunTicket,
        response: Result<CompareResult, ReconError>,
    ) -> (RunCompletion, Vec<StateChange>) {
        let mut completion = RunCompletion::Stale;
        let changes = self.update(|state| {
            if state.run_id != ticket.run_id || !state.is_running() {
                return;
            }
            match response {
                Ok(result) => {
                    state.run_status = RunStatus::Succeeded;
                    state.run_error = None;
                    state.result = Some(Arc::new(result));
                    state.filter = ResultFilter::default();
                    completion = RunCompletion::Succeeded;
                }
                Err(error) => {
                    state.run_status = RunStatus::Failed;
                    state.run_error = Some(error.message());
                    state.clear_result();
                    completion = RunCompletion::Failed;
                }
            }
        });
        if completion == RunCompletion::Stale {
            tracing::debug!("Dropped stale response for run {}", ticket.run_id);
        }
        (completion, changes)
    }

    // ===== Results =====

    pub fn set_filter(&self, filter: ResultFilter) -> Vec<StateChange> {
        self.update(|state| state.filter = filter)
    }

    /// Turn "differences only" on or off; turning it on clears "matches only".
    pub fn toggle_diffs_only(&self, enabled: bool) -> Vec<StateChange> {
        self.update(|state| {
            state.filter.diffs_only = enabled;
            if enabled {
                state.filter.matches_only = false;
            }
        })
    }

    /// Turn "matches only" on or off; turning it on clears "differences only".
    pub fn toggle_matches_only(&self, enabled: bool) -> Vec<StateChange> {
        self.update(|state| {
            state.filter.matches_only = enabled;
            if enabled {
                state.filter.diffs_only = false;
            }
        })
    }

    // ===== Profiles =====

    /// Record the outcome of a profile list request.
    ///
    /// A failure keeps whatever list was fetched before and records the error.
    pub fn set_profiles(&self, response: Result<ProfilesMap, ReconError>) -> Vec<StateChange> {
        self.update(|state| match response {
            Ok(profiles) => {
                state.profiles = Some(profiles);
                state.profiles_error = None;
            }
            Err(error) => state.profiles_error = Some(error.message()),
        })
    }

    /// Record the outcome of a profile save. The configuration is never touched.
    pub fn record_profile_save(&self, response: Result<String, ReconError>) -> Vec<StateChange> {
        self.update(|state| match response {
            Ok(name) => {
                state.save_message = Some(format!("Profile '{name}' saved!"));
                state.save_error = None;
            }
            Err(error) => {
                state.save_message = None;
                state.save_error = Some(error.message());
            }
        })
    }

    pub fn clear_profile_feedback(&self) -> Vec<StateChange> {
        self.update(|state| {
            state.save_message = None;
            state.save_error = None;
        })
    }

    /// Reset the whole workflow: files, configuration, run and results.
    ///
    /// Generation counters and the run id keep increasing so that responses
    /// to requests issued before the reset are still recognised as stale.
    pub fn reset(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            let mut first = std::mem::take(&mut state.first);
            let mut second = std::mem::take(&mut state.second);
            first.clear();
            second.clear();
            *state = WorkflowState {
                first,
                second,
                run_id: state.run_id + 1,
                ..WorkflowState::default()
            };
        });

        let reset_event = StateChange::StateReset;
        let _ = self.state_tx.send(reset_event.clone());
        changes.push(reset_event);

        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across tasks
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompareStats, DownloadToken};

    fn file(name: &str) -> TableFile {
        TableFile::new(name, b"data".to_vec())
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn result(total: u64, matched: u64) -> CompareResult {
        CompareResult::new(
            CompareStats::new(total, matched).unwrap(),
            cols(&["Comparison Key", "Difference"]),
            Vec::new(),
            DownloadToken::new("tok"),
        )
    }

    fn runnable_manager() -> StateManager {
        let manager = StateManager::new();
        let (g1, _) = manager.select_file(SlotId::First, file("a.xlsx"));
        let (g2, _) = manager.select_file(SlotId::Second, file("b.xlsx"));
        manager.apply_discovery(SlotId::First, g1, Ok(cols(&["ID", "Amount"])));
        manager.apply_discovery(SlotId::Second, g2, Ok(cols(&["ID", "Amt"])));
        manager.set_match_keys(SlotId::First, cols(&["ID"])).unwrap();
        manager.set_match_keys(SlotId::Second, cols(&["ID"])).unwrap();
        manager
    }

    #[test]
    fn test_new_state_manager() {
        let manager = StateManager::new();
        let state = manager.snapshot();
        assert!(!state.is_runnable());
        assert_eq!(state.run_status, RunStatus::NotStarted);
    }

    #[test]
    fn test_select_file_emits_slot_change() {
        let manager = StateManager::new();
        let (generation, changes) = manager.select_file(SlotId::First, file("a.xlsx"));

        assert_eq!(generation, 1);
        assert_eq!(
            changes[0],
            StateChange::SlotChanged {
                slot: SlotId::First,
                status: SlotStatus::Discovering,
                columns: 0
            }
        );
    }

    #[test]
    fn test_discovery_initialises_compare_column() {
        let manager = StateManager::new();
        let (generation, _) = manager.select_file(SlotId::First, file("a.xlsx"));
        let (outcome, changes) =
            manager.apply_discovery(SlotId::First, generation, Ok(cols(&["ID", "Amount"])));

        assert_eq!(outcome, DiscoveryOutcome::Ready);
        assert!(changes
            .iter()
            .any(|c| matches!(c, StateChange::ConfigurationChanged { is_runnable: false })));
        assert_eq!(
            manager.read(|s| s.config.compare_column(SlotId::First).map(String::from)),
            Some("ID".to_string())
        );
    }

    #[test]
    fn test_stale_discovery_is_ignored() {
        let manager = StateManager::new();
        let (old, _) = manager.select_file(SlotId::First, file("a.xlsx"));
        let (_new, _) = manager.select_file(SlotId::First, file("b.xlsx"));

        let (outcome, changes) = manager.apply_discovery(SlotId::First, old, Ok(cols(&["Old"])));
        assert_eq!(outcome, DiscoveryOutcome::Stale);
        assert!(changes.is_empty());
        assert_eq!(manager.read(|s| s.first.status()), SlotStatus::Discovering);
    }

    #[test]
    fn test_failed_setter_leaves_state_untouched() {
        let manager = runnable_manager();
        let before = manager.snapshot().config;

        let err = manager
            .set_match_keys(SlotId::First, cols(&["Nope"]))
            .unwrap_err();
        assert!(matches!(err, ReconError::Validation(_)));
        assert_eq!(manager.snapshot().config, before);
    }

    #[test]
    fn test_begin_run_requires_runnable() {
        let manager = StateManager::new();
        let err = manager.begin_run().unwrap_err();
        assert!(matches!(err, ReconError::Precondition(_)));
        assert_eq!(manager.read(|s| s.run_status), RunStatus::NotStarted);
    }

    #[test]
    fn test_begin_run_while_running_is_noop() {
        let manager = runnable_manager();
        let (start, _) = manager.begin_run().unwrap();
        assert!(matches!(start, RunStart::Submitted(_)));

        let (again, changes) = manager.begin_run().unwrap();
        assert!(matches!(again, RunStart::AlreadyRunning));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_run_success_stores_result_and_resets_filter() {
        let manager = runnable_manager();
        let (RunStart::Submitted(ticket), changes) = manager.begin_run().unwrap() else {
            panic!("expected submission");
        };
        assert!(changes.contains(&StateChange::RunStarted { run_id: 1 }));

        manager.set_filter(ResultFilter::DIFFS_ONLY);
        let (completion, _) = manager.finish_run(&ticket, Ok(result(10, 9)));

        assert_eq!(completion, RunCompletion::Succeeded);
        let state = manager.snapshot();
        assert_eq!(state.run_status, RunStatus::Succeeded);
        assert_eq!(state.filter, ResultFilter::ALL);
        assert_eq!(state.result.unwrap().stats().match_percentage(), 90.0);
    }

    #[test]
    fn test_run_failure_discards_prior_result() {
        let manager = runnable_manager();
        let (RunStart::Submitted(ticket), _) = manager.begin_run().unwrap() else {
            panic!("expected submission");
        };
        manager.finish_run(&ticket, Ok(result(4, 4)));

        let (RunStart::Submitted(ticket), _) = manager.begin_run().unwrap() else {
            panic!("expected submission");
        };
        let (completion, _) =
            manager.finish_run(&ticket, Err(ReconError::Run("Comparison error".into())));

        assert_eq!(completion, RunCompletion::Failed);
        let state = manager.snapshot();
        assert!(state.result.is_none());
        assert_eq!(state.run_error.as_deref(), Some("Comparison error"));
    }

    #[test]
    fn test_reselect_during_run_supersedes_it() {
        let manager = runnable_manager();
        let (RunStart::Submitted(ticket), _) = manager.begin_run().unwrap() else {
            panic!("expected submission");
        };

        manager.select_file(SlotId::Second, file("c.xlsx"));
        assert_eq!(manager.read(|s| s.run_status), RunStatus::NotStarted);

        let (completion, _) = manager.finish_run(&ticket, Ok(result(1, 1)));
        assert_eq!(completion, RunCompletion::Stale);
        assert!(manager.read(|s| s.result.is_none()));
    }

    #[test]
    fn test_toggles_are_mutually_exclusive() {
        let manager = StateManager::new();
        manager.toggle_diffs_only(true);
        manager.toggle_matches_only(true);
        assert_eq!(manager.read(|s| s.filter), ResultFilter::MATCHES_ONLY);
    }

    #[test]
    fn test_profile_list_failure_keeps_previous_list() {
        let manager = StateManager::new();
        let mut profiles = ProfilesMap::new();
        profiles.insert("Monthly".into(), ComparePayload::default());
        manager.set_profiles(Ok(profiles));

        let changes = manager.set_profiles(Err(ReconError::Transport("down".into())));
        assert_eq!(
            changes,
            vec![StateChange::ProfilesChanged {
                count: Some(1),
                error: Some("Backend request failed: down".into())
            }]
        );
    }

    #[test]
    fn test_record_profile_save() {
        let manager = StateManager::new();
        manager.record_profile_save(Ok("Monthly".into()));
        assert_eq!(
            manager.read(|s| s.save_message.clone()),
            Some("Profile 'Monthly' saved!".to_string())
        );
    }

    #[test]
    fn test_reset_keeps_generations_increasing() {
        let manager = StateManager::new();
        let (old, _) = manager.select_file(SlotId::First, file("a.xlsx"));

        let changes = manager.reset();
        assert!(changes.contains(&StateChange::StateReset));

        let (outcome, _) = manager.apply_discovery(SlotId::First, old, Ok(cols(&["ID"])));
        assert_eq!(outcome, DiscoveryOutcome::Stale);

        let (next, _) = manager.select_file(SlotId::First, file("a.xlsx"));
        assert!(next > old);
    }

    #[test]
    fn test_subscribe_to_changes() {
        let manager = StateManager::new();
        let mut rx = manager.subscribe();

        manager.select_file(SlotId::Second, file("b.xlsx"));

        let event = rx.try_recv();
        assert!(matches!(
            event,
            Ok(StateChange::SlotChanged {
                slot: SlotId::Second,
                ..
            })
        ));
    }

    #[test]
    fn test_clone_state_manager() {
        let manager1 = StateManager::new();
        let manager2 = manager1.clone();

        manager1.toggle_diffs_only(true);

        assert!(manager2.read(|s| s.filter.diffs_only));
    }
}
