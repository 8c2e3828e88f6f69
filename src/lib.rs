// finrecon - Client for a two-file financial reconciliation service
//
// This is the library crate containing the workflow state, the backend client
// and the screen models. The binary crate (main.rs) provides the command-line front end.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod workflow;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::ReconError;
pub use metrics::Metrics;
pub use models::{ClientSettings, ComparisonConfig, SlotId, TableFile, WorkflowState};
pub use services::{HttpBackend, ReconBackend};
pub use state::{StateChange, StateManager};
pub use workflow::{ProfileManager, ReconWorkflow, ResultsView, RunOutcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
