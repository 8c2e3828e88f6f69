use std::sync::Arc;

use crate::models::{
    CompareResult, ComparisonConfig, FileSlot, ProfilesMap, ResultFilter, SlotId,
};

/// Lifecycle of the run controller: `NotStarted → Running → Succeeded | Failed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
    #[default]
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

/// Single source of truth for the reconciliation screen.
///
/// # Thread Safety
///
/// `WorkflowState` is wrapped in `Arc<RwLock<WorkflowState>>` by
/// [`crate::state::StateManager`]. Mutations go through the manager so that
/// every transition emits its [`crate::state::StateChange`] events.
#[derive(Clone, Debug, Default)]
pub struct WorkflowState {
    // Input files
    pub first: FileSlot,
    pub second: FileSlot,

    // Comparison parameters
    pub config: ComparisonConfig,

    // Run controller
    pub run_status: RunStatus,
    pub run_error: Option<String>,
    /// Identifies the outstanding run; bumped on submission and when a run is superseded
    pub run_id: u64,

    // Results; shared so snapshots stay cheap for large row sets
    pub result: Option<Arc<CompareResult>>,
    pub filter: ResultFilter,

    // Profiles; `None` until the store has answered successfully
    pub profiles: Option<ProfilesMap>,
    pub profiles_error: Option<String>,
    pub save_message: Option<String>,
    pub save_error: Option<String>,
}

impl WorkflowState {
    pub fn slot(&self, id: SlotId) -> &FileSlot {
        match id {
            SlotId::First => &self.first,
            SlotId::Second => &self.second,
        }
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut FileSlot {
        match id {
            SlotId::First => &mut self.first,
            SlotId::Second => &mut self.second,
        }
    }

    pub fn both_ready(&self) -> bool {
        self.first.is_ready() && self.second.is_ready()
    }

    pub fn is_running(&self) -> bool {
        self.run_status == RunStatus::Running
    }

    /// True iff both files are ready, both key sets are non-empty, both
    /// compare columns are set, and no run is in flight.
    pub fn is_runnable(&self) -> bool {
        self.both_ready() && self.config.has_required_fields() && !self.is_running()
    }

    /// Human-readable reasons why [`is_runnable`](Self::is_runnable) is false.
    pub fn runnability_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for id in SlotId::ALL {
            if !self.slot(id).is_ready() {
                problems.push(format!("{id} file is not loaded"));
            }
        }
        problems.extend(
            self.config
                .missing_fields()
                .into_iter()
                .map(|field| format!("{field} not set")),
        );
        if self.is_running() {
            problems.push("a comparison is already running".to_string());
        }
        problems
    }

    /// Drop the current result and reset the filter toggles.
    pub fn clear_result(&mut self) {
        self.result = None;
        self.filter = ResultFilter::default();
    }
}
