//! Services module - Access to the external comparison service.
//!
//! Everything here talks to (or guards calls to) the backend. Nothing in this
//! module holds workflow state; that lives in [`crate::state::StateManager`].
//!
//! # Components
//!
//! - [`ReconBackend`]: The contract with the comparison service. Covers:
//!   - Column discovery for one uploaded file
//!   - Running a comparison with two files and a configuration
//!   - Downloading the artifact of a finished run
//!   - Listing, saving and deleting named profiles
//!
//! - [`HttpBackend`]: `reqwest` implementation of [`ReconBackend`]. Non-success
//!   responses become [`BackendError::Status`] with the body text verbatim.
//!
//! - [`ProfileStore`]: Profile CRUD with client-side name validation.
//!
//! - [`is_supported_table_file`]: Extension check callers run before discovery.
//!
//! # Usage Example
//!
//! ```ignore
//! use finrecon::services::{HttpBackend, ReconBackend};
//!
//! let backend = HttpBackend::new(&settings)?;
//! let file = TableFile::open("ledger.xlsx".into()).await?;
//! let columns = backend.discover_columns(&file).await?;
//! ```

pub mod backend;
pub mod file_types;
pub mod profile_store;

pub use backend::{BackendError, HttpBackend, ReconBackend};
pub use file_types::{is_supported_table_file, supported_extensions_hint, SUPPORTED_EXTENSIONS};
pub use profile_store::{validate_name, ProfileStore};
