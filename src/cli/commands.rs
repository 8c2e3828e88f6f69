//! Command implementations.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use finrecon::models::{ClientSettings, SlotId, TableFile, ToleranceType};
use finrecon::services::{is_supported_table_file, supported_extensions_hint};
use finrecon::workflow::{ProfileManager, ReconWorkflow, RunOutcome};
use finrecon::{HttpBackend, Metrics, ReconBackend, StateManager};

use crate::cli::args::{Command, ProfilesCommand, ReconcileArgs};
use crate::cli::output;

pub async fn dispatch(command: Command, settings: &ClientSettings, metrics: Arc<Metrics>) -> Result<()> {
    let backend: Arc<dyn ReconBackend> =
        Arc::new(HttpBackend::new(settings).context("Failed to configure the backend client")?);
    let workflow = ReconWorkflow::with_parts(Arc::new(StateManager::new()), backend, metrics);

    match command {
        Command::Columns { file } => run_columns(&workflow, &file).await,
        Command::Reconcile(args) => run_reconcile(&workflow, &args, settings).await,
        Command::Profiles(ProfilesCommand::List { details }) => run_profiles_list(&workflow, details).await,
        Command::Profiles(ProfilesCommand::Delete { name }) => run_profiles_delete(&workflow, &name).await,
    }
}

async fn open_table_file(path: &Utf8Path) -> Result<TableFile> {
    if !is_supported_table_file(path) {
        bail!("{path}: unsupported file type, expected {}", supported_extensions_hint());
    }
    TableFile::open(path)
        .await
        .with_context(|| format!("Failed to read {path}"))
}

async fn run_columns(workflow: &ReconWorkflow, path: &Utf8Path) -> Result<()> {
    let file = open_table_file(path).await?;
    let name = file.name().to_string();
    workflow.select_file(SlotId::First, file).await?;

    let columns = workflow.state().read(|s| s.first.columns().to_vec());
    output::print_columns(&name, &columns);
    Ok(())
}

async fn run_reconcile(workflow: &ReconWorkflow, args: &ReconcileArgs, settings: &ClientSettings) -> Result<()> {
    let (first, second) = tokio::try_join!(open_table_file(&args.first), open_table_file(&args.second))?;

    let (first_outcome, second_outcome) = workflow.select_files(first, second).await;
    first_outcome?;
    second_outcome?;

    if let Some(name) = &args.profile {
        if let Some(error) = workflow.state().read(|s| s.profiles_error.clone()) {
            bail!("Cannot load profile '{name}': {error}");
        }
        workflow.load_profile(name)?;
    }

    if !args.keys_first.is_empty() {
        workflow.set_match_keys(SlotId::First, args.keys_first.clone())?;
    }
    if !args.keys_second.is_empty() {
        workflow.set_match_keys(SlotId::Second, args.keys_second.clone())?;
    }
    if let Some(column) = &args.compare_first {
        workflow.set_compare_column(SlotId::First, column.as_str())?;
    }
    if let Some(column) = &args.compare_second {
        workflow.set_compare_column(SlotId::Second, column.as_str())?;
    }
    if let Some(tolerance) = args.tolerance {
        workflow.set_tolerance(ToleranceType::from(tolerance), args.tolerance_value)?;
    }

    if let Some(name) = &args.save_profile {
        let stored = workflow.save_profile(name).await?;
        println!("Profile '{stored}' saved!");
    }

    match workflow.run().await? {
        RunOutcome::Succeeded => {}
        RunOutcome::Superseded | RunOutcome::AlreadyRunning => {
            bail!("Comparison did not complete");
        }
    }

    workflow.set_filter(args.show.into());
    let limit = args.rows.unwrap_or(settings.preview_rows);
    workflow.with_results(|view| {
        if let Some(view) = view {
            output::print_stats(&view);
            output::print_rows(&view, limit);
        }
    });

    if let Some(path) = &args.download {
        let bytes = workflow.download().await?;
        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("Failed to write {path}"))?;
        println!("Results written to {path}");
    }

    Ok(())
}

async fn run_profiles_list(workflow: &ReconWorkflow, details: bool) -> Result<()> {
    let mut manager = ProfileManager::new(workflow.profile_store().clone());
    manager.load().await?;
    output::print_profiles(&manager.count_label(), &manager.summaries(), details);
    Ok(())
}

async fn run_profiles_delete(workflow: &ReconWorkflow, name: &str) -> Result<()> {
    let mut manager = ProfileManager::new(workflow.profile_store().clone());
    manager.delete(name).await?;
    println!("Profile '{name}' deleted. {}", manager.count_label());
    Ok(())
}
