//! Data models for the reconciliation workflow.
//!
//! This module contains the plain data structures shared by every component:
//! - [`FileSlot`]: One of the two input files, its discovered columns and status
//! - [`ComparisonConfig`]: Match keys, compare columns and tolerance for a run
//! - [`ComparePayload`]: Wire shape of a compare request and of a stored profile
//! - [`CompareResult`]: Statistics, columns, rows and download token of a run
//! - [`WorkflowState`]: Everything the reconciliation screen shows, in one place
//! - [`ClientSettings`]: Backend URL, timeout and logging preferences
//!
//! # Architecture Note
//!
//! The models carry their own invariants (slot generations, derived match
//! percentage, column-bound setters) but perform no I/O. State updates go
//! through [`StateManager`](crate::state::StateManager) so every change is
//! broadcast.

pub mod comparison;
pub mod config;
pub mod file_slot;
pub mod result;
pub mod workflow_state;

pub use comparison::{ComparePayload, ComparisonConfig, ProfilesMap, ToleranceType};
pub use config::ClientSettings;
pub use file_slot::{DiscoveryOutcome, FileSlot, SlotId, SlotStatus, TableFile};
pub use result::{
    CompareResponse, CompareResult, CompareStats, DownloadToken, ResultFilter, ResultRow,
    WireStats, DIFFERENCE_FIELD,
};
pub use workflow_state::{RunStatus, WorkflowState};
