use std::collections::HashSet;

use crate::error::ReconError;
use crate::models::{ComparePayload, ProfilesMap, ToleranceType};
use crate::services::ProfileStore;

const EMPTY_FIELD: &str = "—";

/// Display strings for one stored profile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSummary {
    pub name: String,
    pub match_keys_first: String,
    pub match_keys_second: String,
    pub compare_col_first: String,
    pub compare_col_second: String,
    pub tolerance: String,
}

impl ProfileSummary {
    pub fn new(name: &str, profile: &ComparePayload) -> Self {
        Self {
            name: name.to_string(),
            match_keys_first: or_placeholder(profile.match_keys_first.join(", ")),
            match_keys_second: or_placeholder(profile.match_keys_second.join(", ")),
            compare_col_first: or_placeholder(profile.compare_col_first.clone()),
            compare_col_second: or_placeholder(profile.compare_col_second.clone()),
            tolerance: tolerance_display(profile),
        }
    }
}

fn or_placeholder(text: String) -> String {
    if text.is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        text
    }
}

/// `None` for no tolerance, otherwise the type label followed by the value.
pub fn tolerance_display(profile: &ComparePayload) -> String {
    match (profile.tolerance_type, profile.tolerance_value) {
        (ToleranceType::None, _) => "None".to_string(),
        (kind, Some(value)) => format!("{} {}", kind.label(), value),
        (kind, None) => format!("{} ", kind.label()),
    }
}

/// Model of the profile-management screen: list, inspect and delete profiles.
///
/// Unlike the reconciliation workflow this screen owns its own list, loaded
/// on demand; nothing is shared between the two.
pub struct ProfileManager {
    store: ProfileStore,
    profiles: ProfilesMap,
    expanded: HashSet<String>,
    loading: bool,
    error: Option<String>,
}

impl ProfileManager {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            profiles: ProfilesMap::new(),
            expanded: HashSet::new(),
            loading: false,
            error: None,
        }
    }

    /// Reload the list. On failure the error is recorded and the previous list kept.
    pub async fn load(&mut self) -> Result<(), ReconError> {
        self.loading = true;
        let response = self.store.list().await;
        self.loading = false;

        match response {
            Ok(profiles) => {
                self.expanded.retain(|name| profiles.contains_key(name));
                self.profiles = profiles;
                self.error = None;
                Ok(())
            }
            Err(error) => {
                self.error = Some(error.message());
                Err(error)
            }
        }
    }

    /// Delete a profile, then reload the list.
    pub async fn delete(&mut self, name: &str) -> Result<(), ReconError> {
        if let Err(error) = self.store.delete(name).await {
            self.error = Some(error.message());
            return Err(error);
        }
        self.load().await
    }

    pub fn toggle_expand(&mut self, name: &str) {
        if !self.expanded.remove(name) {
            self.expanded.insert(name.to_string());
        }
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn profiles(&self) -> &ProfilesMap {
        &self.profiles
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn summaries(&self) -> Vec<ProfileSummary> {
        self.profiles
            .iter()
            .map(|(name, profile)| ProfileSummary::new(name, profile))
            .collect()
    }

    /// `"1 profile saved"`, `"3 profiles saved"`
    pub fn count_label(&self) -> String {
        let count = self.profiles.len();
        let plural = if count == 1 { "" } else { "s" };
        format!("{count} profile{plural} saved")
    }
}
