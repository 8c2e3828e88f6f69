use std::sync::Arc;

use crate::error::ReconError;
use crate::models::{ComparePayload, ProfilesMap};
use crate::services::backend::{BackendError, ReconBackend};

/// CRUD access to named configuration profiles.
///
/// Holds no cache: every call goes to the store. Failures of any kind are
/// reported as [`ReconError::Transport`] carrying the backend's message.
#[derive(Clone)]
pub struct ProfileStore {
    backend: Arc<dyn ReconBackend>,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn ReconBackend>) -> Self {
        Self { backend }
    }

    /// All stored profiles. An empty map means the store is genuinely empty.
    pub async fn list(&self) -> Result<ProfilesMap, ReconError> {
        let profiles = self.backend.list_profiles().await.map_err(transport)?;
        tracing::debug!("Fetched {} profiles", profiles.len());
        Ok(profiles)
    }

    /// Upsert a profile. Returns the trimmed name it was stored under.
    ///
    /// A blank name is rejected before any request is made.
    pub async fn save(&self, name: &str, config: &ComparePayload) -> Result<String, ReconError> {
        let name = validate_name(name)?;
        self.backend
            .save_profile(&name, config)
            .await
            .map_err(transport)?;
        tracing::info!("Saved profile '{}'", name);
        Ok(name)
    }

    /// Remove a profile. Deleting a name that does not exist is not an error.
    pub async fn delete(&self, name: &str) -> Result<(), ReconError> {
        self.backend.delete_profile(name).await.map_err(transport)?;
        tracing::info!("Deleted profile '{}'", name);
        Ok(())
    }
}

/// Trim a profile name, rejecting empty or whitespace-only names.
pub fn validate_name(name: &str) -> Result<String, ReconError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ReconError::Validation(
            "Enter a profile name before saving.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn transport(error: BackendError) -> ReconError {
    let message = match error {
        BackendError::Status { body, .. } => body,
        other => other.to_string(),
    };
    ReconError::Transport(message)
}
