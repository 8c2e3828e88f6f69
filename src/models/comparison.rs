use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReconError;
use crate::models::SlotId;

/// Named configuration profiles, in the order the store returned them.
pub type ProfilesMap = IndexMap<String, ComparePayload>;

/// How compared values may differ and still count as a match.
///
/// The wire labels are the ones the comparison engine expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToleranceType {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Dollar ($)")]
    Absolute,
    #[serde(rename = "Percentage (%)")]
    Percentage,
}

impl ToleranceType {
    pub fn label(self) -> &'static str {
        match self {
            ToleranceType::None => "None",
            ToleranceType::Absolute => "Dollar ($)",
            ToleranceType::Percentage => "Percentage (%)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "None" => Some(ToleranceType::None),
            "Dollar ($)" => Some(ToleranceType::Absolute),
            "Percentage (%)" => Some(ToleranceType::Percentage),
            _ => None,
        }
    }
}

/// Wire shape shared by the compare request's `config` field and stored profiles.
///
/// Deserialization is lenient because profiles may have been written by older
/// clients: missing or null fields fall back to empty values and an unknown
/// tolerance label falls back to [`ToleranceType::None`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparePayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_keys_first: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub match_keys_second: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub compare_col_first: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub compare_col_second: String,

    #[serde(default, deserialize_with = "lenient_tolerance")]
    pub tolerance_type: ToleranceType,

    #[serde(default)]
    pub tolerance_value: Option<f64>,
}

impl ComparePayload {
    pub fn match_keys(&self, slot: SlotId) -> &[String] {
        match slot {
            SlotId::First => &self.match_keys_first,
            SlotId::Second => &self.match_keys_second,
        }
    }

    pub fn compare_column(&self, slot: SlotId) -> &str {
        match slot {
            SlotId::First => &self.compare_col_first,
            SlotId::Second => &self.compare_col_second,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_tolerance<'de, D>(deserializer: D) -> Result<ToleranceType, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label
        .as_deref()
        .and_then(ToleranceType::from_label)
        .unwrap_or_default())
}

/// Parameters governing one comparison run.
///
/// Match keys and compare columns are kept as subsets of the owning slot's
/// discovered columns by the setters; callers pass the current column list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonConfig {
    match_keys_first: Vec<String>,
    match_keys_second: Vec<String>,
    compare_col_first: Option<String>,
    compare_col_second: Option<String>,
    tolerance_type: ToleranceType,
    tolerance_value: f64,
}

impl ComparisonConfig {
    pub fn match_keys(&self, slot: SlotId) -> &[String] {
        match slot {
            SlotId::First => &self.match_keys_first,
            SlotId::Second => &self.match_keys_second,
        }
    }

    pub fn compare_column(&self, slot: SlotId) -> Option<&str> {
        match slot {
            SlotId::First => self.compare_col_first.as_deref(),
            SlotId::Second => self.compare_col_second.as_deref(),
        }
    }

    pub fn tolerance_type(&self) -> ToleranceType {
        self.tolerance_type
    }

    pub fn tolerance_value(&self) -> f64 {
        self.tolerance_value
    }

    fn keys_mut(&mut self, slot: SlotId) -> &mut Vec<String> {
        match slot {
            SlotId::First => &mut self.match_keys_first,
            SlotId::Second => &mut self.match_keys_second,
        }
    }

    fn compare_mut(&mut self, slot: SlotId) -> &mut Option<String> {
        match slot {
            SlotId::First => &mut self.compare_col_first,
            SlotId::Second => &mut self.compare_col_second,
        }
    }

    /// Both key sets non-empty and both compare columns chosen.
    pub fn has_required_fields(&self) -> bool {
        !self.match_keys_first.is_empty()
            && !self.match_keys_second.is_empty()
            && self.compare_col_first.is_some()
            && self.compare_col_second.is_some()
    }

    /// Names of the configuration fields still missing, for error messages.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for slot in SlotId::ALL {
            if self.match_keys(slot).is_empty() {
                missing.push(format!("match keys ({slot} file)"));
            }
            if self.compare_column(slot).is_none() {
                missing.push(format!("compare column ({slot} file)"));
            }
        }
        missing
    }

    /// Replace the match keys for a slot.
    ///
    /// Every key must be one of `available`; repeated names are collapsed,
    /// keeping the first occurrence.
    pub fn set_match_keys(
        &mut self,
        slot: SlotId,
        keys: Vec<String>,
        available: &[String],
    ) -> Result<(), ReconError> {
        if let Some(unknown) = keys.iter().find(|k| !available.contains(k)) {
            return Err(ReconError::Validation(format!(
                "Column '{unknown}' is not in the {slot} file"
            )));
        }
        let mut deduped: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            if !deduped.contains(&key) {
                deduped.push(key);
            }
        }
        *self.keys_mut(slot) = deduped;
        Ok(())
    }

    pub fn set_compare_column(
        &mut self,
        slot: SlotId,
        column: String,
        available: &[String],
    ) -> Result<(), ReconError> {
        if !available.contains(&column) {
            return Err(ReconError::Validation(format!(
                "Column '{column}' is not in the {slot} file"
            )));
        }
        *self.compare_mut(slot) = Some(column);
        Ok(())
    }

    /// Set the tolerance. The value must be finite and non-negative, and at
    /// most 100 for a percentage tolerance. It is kept even for
    /// [`ToleranceType::None`] but never sent in that case.
    pub fn set_tolerance(
        &mut self,
        tolerance_type: ToleranceType,
        value: f64,
    ) -> Result<(), ReconError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ReconError::Validation(
                "Tolerance value must be a non-negative number".to_string(),
            ));
        }
        if tolerance_type == ToleranceType::Percentage && value > 100.0 {
            return Err(ReconError::Validation(
                "Percentage tolerance cannot exceed 100".to_string(),
            ));
        }
        self.tolerance_type = tolerance_type;
        self.tolerance_value = value;
        Ok(())
    }

    /// Bring the slot's fields in line with a freshly discovered column list.
    ///
    /// Keys that no longer exist are dropped; an unset or vanished compare
    /// column is initialised to the first column.
    pub fn sync_with_columns(&mut self, slot: SlotId, columns: &[String]) {
        self.keys_mut(slot).retain(|k| columns.contains(k));

        let compare = self.compare_mut(slot);
        let keep = compare.as_ref().is_some_and(|c| columns.contains(c));
        if !keep {
            *compare = columns.first().cloned();
        }
    }

    /// Copy a stored profile into this configuration.
    ///
    /// Match keys absent from the current columns are silently dropped, and a
    /// compare column is only applied when it exists in its file; otherwise the
    /// current value is left as is.
    pub fn apply_profile(
        &mut self,
        profile: &ComparePayload,
        first_columns: &[String],
        second_columns: &[String],
    ) {
        for (slot, columns) in [(SlotId::First, first_columns), (SlotId::Second, second_columns)] {
            let mut keys: Vec<String> = Vec::new();
            for key in profile.match_keys(slot) {
                if columns.contains(key) && !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            *self.keys_mut(slot) = keys;

            let column = profile.compare_column(slot);
            if !column.is_empty() && columns.iter().any(|c| c == column) {
                *self.compare_mut(slot) = Some(column.to_string());
            }
        }

        self.tolerance_type = profile.tolerance_type;
        self.tolerance_value = profile
            .tolerance_value
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0);
    }

    /// Serialize to the compare request / profile shape.
    ///
    /// With no tolerance the value is sent as null whatever is stored.
    pub fn to_request_payload(&self) -> ComparePayload {
        ComparePayload {
            match_keys_first: self.match_keys_first.clone(),
            match_keys_second: self.match_keys_second.clone(),
            compare_col_first: self.compare_col_first.clone().unwrap_or_default(),
            compare_col_second: self.compare_col_second.clone().unwrap_or_default(),
            tolerance_type: self.tolerance_type,
            tolerance_value: match self.tolerance_type {
                ToleranceType::None => None,
                _ => Some(self.tolerance_value),
            },
        }
    }
}
