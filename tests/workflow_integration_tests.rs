//! End-to-end workflow scenarios against a scripted in-memory backend
//!
//! These tests verify:
//! - The reference reconciliation scenario (90% match, one unmatched record)
//! - Late discovery and run responses are dropped after reselection
//! - Only one run is in flight at a time
//! - Profiles load leniently and save without touching the configuration
//! - Failed runs leave no result behind

use async_trait::async_trait;
use finrecon::models::{
    ComparePayload, CompareResponse, DiscoveryOutcome, DownloadToken, ProfilesMap, ResultFilter,
    ResultRow, RunStatus, SlotId, SlotStatus, TableFile, ToleranceType, WireStats,
};
use finrecon::services::{BackendError, ReconBackend};
use finrecon::{ReconError, ReconWorkflow, RunOutcome};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Backend whose answers are scripted per file name, with optional gates that
/// hold a response until the test releases it.
#[derive(Default)]
struct ScriptedBackend {
    columns: HashMap<String, Result<Vec<String>, BackendError>>,
    discovery_gates: HashMap<String, Arc<Notify>>,
    compare_response: Mutex<Option<Result<CompareResponse, BackendError>>>,
    compare_gate: Option<Arc<Notify>>,
    profiles: Mutex<ProfilesMap>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        let mut backend = Self::default();
        backend
            .columns
            .insert("first.xlsx".into(), Ok(cols(&["ID", "Amount"])));
        backend
            .columns
            .insert("second.xlsx".into(), Ok(cols(&["ID", "Amt"])));
        backend
    }

    fn with_compare(self, response: Result<CompareResponse, BackendError>) -> Self {
        *self.compare_response.lock().unwrap() = Some(response);
        self
    }

    fn set_compare(&self, response: Result<CompareResponse, BackendError>) {
        *self.compare_response.lock().unwrap() = Some(response);
    }

    fn calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReconBackend for ScriptedBackend {
    async fn discover_columns(&self, file: &TableFile) -> Result<Vec<String>, BackendError> {
        self.record(format!("columns:{}", file.name()));
        if let Some(gate) = self.discovery_gates.get(file.name()) {
            gate.notified().await;
        }
        self.columns
            .get(file.name())
            .cloned()
            .unwrap_or_else(|| Err(BackendError::Status {
                status: 400,
                body: format!("Error reading {}", file.name()),
            }))
    }

    async fn compare(
        &self,
        first: &TableFile,
        second: &TableFile,
        config: &ComparePayload,
    ) -> Result<CompareResponse, BackendError> {
        self.record(format!(
            "compare:{}:{}:{}",
            first.name(),
            second.name(),
            serde_json::to_string(config).unwrap()
        ));
        if let Some(gate) = &self.compare_gate {
            gate.notified().await;
        }
        self.compare_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(BackendError::Transport("no response scripted".into())))
    }

    async fn download(&self, token: &DownloadToken) -> Result<Vec<u8>, BackendError> {
        self.record(format!("download:{}", token.as_str()));
        Ok(token.as_str().as_bytes().to_vec())
    }

    async fn list_profiles(&self) -> Result<ProfilesMap, BackendError> {
        self.record("profiles:list".to_string());
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn save_profile(&self, name: &str, config: &ComparePayload) -> Result<(), BackendError> {
        self.record(format!("profiles:save:{name}"));
        self.profiles
            .lock()
            .unwrap()
            .insert(name.to_string(), config.clone());
        Ok(())
    }

    async fn delete_profile(&self, name: &str) -> Result<(), BackendError> {
        self.record(format!("profiles:delete:{name}"));
        self.profiles.lock().unwrap().shift_remove(name);
        Ok(())
    }
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn file(name: &str) -> TableFile {
    TableFile::new(name, name.as_bytes().to_vec())
}

fn row(key: &str, difference: bool) -> ResultRow {
    [
        ("Comparison Key".to_string(), json!(key)),
        ("Amount".to_string(), json!(100.5)),
        ("Difference".to_string(), json!(difference)),
    ]
    .into_iter()
    .collect()
}

/// Ten records, nine matched.
fn ninety_percent() -> CompareResponse {
    let rows = (0..10).map(|i| row(&format!("K{i}"), i == 3)).collect();
    CompareResponse {
        stats: WireStats {
            total_records: 10,
            matched_records: 9,
            match_percentage: Some(90.0),
        },
        columns: cols(&["Comparison Key", "Amount", "Difference"]),
        rows,
        download_token: DownloadToken::new("tok-90"),
    }
}

async fn load_both(workflow: &ReconWorkflow) {
    let (a, b) = workflow
        .select_files(file("first.xlsx"), file("second.xlsx"))
        .await;
    assert_eq!(a.unwrap(), DiscoveryOutcome::Ready);
    assert_eq!(b.unwrap(), DiscoveryOutcome::Ready);
}

async fn runnable(backend: Arc<ScriptedBackend>) -> ReconWorkflow {
    let workflow = ReconWorkflow::new(backend);
    load_both(&workflow).await;
    workflow.set_match_keys(SlotId::First, cols(&["ID"])).unwrap();
    workflow.set_match_keys(SlotId::Second, cols(&["ID"])).unwrap();
    workflow.set_compare_column(SlotId::First, "Amount").unwrap();
    workflow.set_compare_column(SlotId::Second, "Amt").unwrap();
    workflow
}

#[tokio::test]
async fn test_reference_scenario() {
    let backend = Arc::new(ScriptedBackend::new().with_compare(Ok(ninety_percent())));
    let workflow = runnable(Arc::clone(&backend)).await;

    assert!(workflow.snapshot().is_runnable());
    assert_eq!(workflow.run().await.unwrap(), RunOutcome::Succeeded);

    let calls = backend.calls.lock().unwrap().clone();
    let compare = calls.iter().find(|c| c.starts_with("compare:")).unwrap();
    assert!(compare.contains(r#""tolerance_type":"None""#));
    assert!(compare.contains(r#""tolerance_value":null"#));
    assert!(compare.contains(r#""compare_col_second":"Amt""#));

    workflow.with_results(|view| {
        let view = view.expect("result stored");
        assert_eq!(view.match_percentage(), 90.0);
        assert_eq!(view.unmatched_records(), 1);
        assert_eq!(view.rows().len(), 10);
    });

    workflow.toggle_diffs_only(true);
    workflow.with_results(|view| {
        let view = view.unwrap();
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.preview_label(), "Preview Results (1 rows)");
    });

    assert_eq!(workflow.download().await.unwrap(), b"tok-90".to_vec());
}

#[tokio::test]
async fn test_profiles_fetched_when_both_ready() {
    let backend = Arc::new(ScriptedBackend::new());
    let workflow = ReconWorkflow::new(Arc::clone(&backend) as Arc<dyn ReconBackend>);

    workflow
        .select_file(SlotId::First, file("first.xlsx"))
        .await
        .unwrap();
    assert_eq!(backend.calls("profiles:list"), 0);
    assert!(workflow.snapshot().profiles.is_none());

    workflow
        .select_file(SlotId::Second, file("second.xlsx"))
        .await
        .unwrap();
    assert_eq!(backend.calls("profiles:list"), 1);
    assert_eq!(workflow.snapshot().profiles, Some(ProfilesMap::new()));
}

#[tokio::test]
async fn test_late_discovery_response_is_ignored() {
    let gate = Arc::new(Notify::new());
    let mut backend = ScriptedBackend::new();
    backend
        .columns
        .insert("old.xlsx".into(), Ok(cols(&["Stale", "Columns"])));
    backend.discovery_gates.insert("old.xlsx".into(), Arc::clone(&gate));
    let workflow = ReconWorkflow::new(Arc::new(backend));

    let (old, new) = tokio::join!(
        workflow.select_file(SlotId::First, file("old.xlsx")),
        async {
            let outcome = workflow.select_file(SlotId::First, file("first.xlsx")).await;
            gate.notify_one();
            outcome
        }
    );

    assert_eq!(old.unwrap(), DiscoveryOutcome::Stale);
    assert_eq!(new.unwrap(), DiscoveryOutcome::Ready);
    let state = workflow.snapshot();
    assert_eq!(state.first.columns(), cols(&["ID", "Amount"]).as_slice());
    assert_eq!(state.first.file().map(TableFile::name), Some("first.xlsx"));
    assert_eq!(
        workflow
            .metrics()
            .stale_responses
            .load(std::sync::atomic::Ordering::Relaxed),
        1
    );
}

#[tokio::test]
async fn test_reselecting_during_run_supersedes_it() {
    let gate = Arc::new(Notify::new());
    let mut backend = ScriptedBackend::new().with_compare(Ok(ninety_percent()));
    backend.compare_gate = Some(Arc::clone(&gate));
    let workflow = runnable(Arc::new(backend)).await;

    let (run, reselect) = tokio::join!(workflow.run(), async {
        let outcome = workflow
            .select_file(SlotId::Second, file("second.xlsx"))
            .await;
        gate.notify_one();
        outcome
    });

    assert_eq!(run.unwrap(), RunOutcome::Superseded);
    assert_eq!(reselect.unwrap(), DiscoveryOutcome::Ready);
    let state = workflow.snapshot();
    assert_eq!(state.run_status, RunStatus::NotStarted);
    assert!(state.result.is_none());
    assert!(state.is_runnable());
}

#[tokio::test]
async fn test_second_run_while_first_in_flight_is_noop() {
    let gate = Arc::new(Notify::new());
    let mut backend = ScriptedBackend::new().with_compare(Ok(ninety_percent()));
    backend.compare_gate = Some(Arc::clone(&gate));
    let backend = Arc::new(backend);
    let workflow = runnable(Arc::clone(&backend)).await;

    let (first, second) = tokio::join!(workflow.run(), async {
        let outcome = workflow.run().await;
        gate.notify_one();
        outcome
    });

    assert_eq!(first.unwrap(), RunOutcome::Succeeded);
    assert_eq!(second.unwrap(), RunOutcome::AlreadyRunning);
    assert_eq!(backend.calls("compare:"), 1);
}

#[tokio::test]
async fn test_failed_run_discards_previous_result() {
    let backend = Arc::new(ScriptedBackend::new().with_compare(Ok(ninety_percent())));
    let workflow = runnable(Arc::clone(&backend)).await;
    workflow.run().await.unwrap();
    workflow.toggle_matches_only(true);

    backend.set_compare(Err(BackendError::Status {
        status: 400,
        body: "Comparison error: 'Amt'".into(),
    }));
    let err = workflow.run().await.unwrap_err();

    assert_eq!(err, ReconError::Run("Comparison error: 'Amt'".into()));
    let state = workflow.snapshot();
    assert_eq!(state.run_status, RunStatus::Failed);
    assert!(state.result.is_none());
    assert_eq!(state.filter, ResultFilter::ALL);
    assert!(workflow.with_results(|view| view.is_none()));
}

#[tokio::test]
async fn test_not_runnable_run_is_rejected_without_backend_call() {
    let backend = Arc::new(ScriptedBackend::new().with_compare(Ok(ninety_percent())));
    let workflow = ReconWorkflow::new(Arc::clone(&backend) as Arc<dyn ReconBackend>);
    load_both(&workflow).await;

    assert!(matches!(
        workflow.run().await,
        Err(ReconError::Precondition(_))
    ));
    assert_eq!(backend.calls("compare:"), 0);
}

#[tokio::test]
async fn test_stale_profile_loads_leniently() {
    let backend = ScriptedBackend::new();
    backend.profiles.lock().unwrap().insert(
        "Quarterly".into(),
        ComparePayload {
            match_keys_first: cols(&["ID", "Region"]),
            match_keys_second: cols(&["ID"]),
            compare_col_first: "Amount".into(),
            compare_col_second: "Total".into(),
            tolerance_type: ToleranceType::Percentage,
            tolerance_value: None,
        },
    );
    let workflow = ReconWorkflow::new(Arc::new(backend));
    load_both(&workflow).await;

    workflow.load_profile("Quarterly").unwrap();

    let config = workflow.snapshot().config;
    assert_eq!(config.match_keys(SlotId::First), cols(&["ID"]).as_slice());
    assert_eq!(config.match_keys(SlotId::Second), cols(&["ID"]).as_slice());
    assert_eq!(config.compare_column(SlotId::First), Some("Amount"));
    assert_eq!(config.compare_column(SlotId::Second), Some("ID"));
    assert_eq!(config.tolerance_type(), ToleranceType::Percentage);
    assert_eq!(config.tolerance_value(), 0.0);
}

#[tokio::test]
async fn test_blank_profile_name_makes_no_call() {
    let backend = Arc::new(ScriptedBackend::new());
    let workflow = runnable(Arc::clone(&backend)).await;
    let before = workflow.snapshot().config;

    let err = workflow.save_profile("   ").await.unwrap_err();

    assert_eq!(
        err,
        ReconError::Validation("Enter a profile name before saving.".into())
    );
    assert_eq!(backend.calls("profiles:save"), 0);
    let state = workflow.snapshot();
    assert_eq!(
        state.save_error.as_deref(),
        Some("Enter a profile name before saving.")
    );
    assert_eq!(state.config, before);
}

#[tokio::test]
async fn test_saved_profile_round_trips_through_store() {
    let backend = Arc::new(ScriptedBackend::new());
    let workflow = runnable(Arc::clone(&backend)).await;
    workflow
        .set_tolerance(ToleranceType::Absolute, 0.05)
        .unwrap();

    workflow.save_profile("Monthly").await.unwrap();

    let stored = backend.profiles.lock().unwrap()["Monthly"].clone();
    assert_eq!(stored.tolerance_type, ToleranceType::Absolute);
    assert_eq!(stored.tolerance_value, Some(0.05));
    assert_eq!(
        workflow.snapshot().profiles.map(|p| p.contains_key("Monthly")),
        Some(true)
    );
}

#[tokio::test]
async fn test_discovery_failure_surfaces_backend_text() {
    let backend = Arc::new(ScriptedBackend::new());
    let workflow = ReconWorkflow::new(backend);

    let err = workflow
        .select_file(SlotId::First, file("unknown.xlsx"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Error reading unknown.xlsx");
    let state = workflow.snapshot();
    assert_eq!(state.first.status(), SlotStatus::Failed);
    assert!(state.first.columns().is_empty());
}
