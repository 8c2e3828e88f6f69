//! Workflow module - Screen-level orchestration.
//!
//! - [`ReconWorkflow`]: The reconciliation screen. Drives discovery, runs,
//!   downloads and profile load/save through the backend, and keeps every
//!   outcome in [`crate::state::StateManager`].
//! - [`ResultsView`]: Pure derivations over a stored result (filtered rows,
//!   severity, cell formatting).
//! - [`ProfileManager`]: The profile-management screen.

pub mod coordinator;
pub mod profiles_screen;
pub mod results;

pub use coordinator::{ReconWorkflow, RunOutcome};
pub use profiles_screen::{tolerance_display, ProfileManager, ProfileSummary};
pub use results::{filter_rows, format_cell, MatchSeverity, ResultsView};
