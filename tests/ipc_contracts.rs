mod common;

use fraudlens_lib::commands::estimator::{
    analyze_internal, clear_history_internal, export_history_internal, history_internal,
    load_sample_internal, model_status_internal, preview_internal, session_statistics_internal,
    AnalysisResponse, ModelAvailability, EXPORT_FILE_PREFIX,
};
use fraudlens_lib::commands::settings::{
    load_effective_settings, load_settings_from_disk, save_settings_to_disk, EffectiveSettings,
};
use fraudlens_lib::commands::AppState;
use fraudlens_lib::models::application::{LoanApplication, SamplePreset};
use fraudlens_lib::models::history::SessionHistory;
use fraudlens_lib::models::prediction::FraudClass;
use serde_json::json;
use std::fs;
use std::thread;
use tempfile::TempDir;

fn ready_model() -> (TempDir, ModelAvailability) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let (model_path, scaler_path) = common::write_artifacts(temp_dir.path(), &common::ltv_credit_forest());
    let model = ModelAvailability::load(&model_path, &scaler_path);
    (temp_dir, model)
}

fn analyze(
    application: LoanApplication,
    model: &ModelAvailability,
    history: SessionHistory,
) -> (AnalysisResponse, SessionHistory) {
    analyze_internal(application, model, 0.05, 1000, history)
}

#[test]
fn model_status_reports_loaded_and_missing_artifacts() {
    let (_tmp, model) = ready_model();
    let status = model_status_internal(&model);
    assert!(status.available);
    assert_eq!(status.algorithm.as_deref(), Some("Random Forest"));

    let empty = tempfile::tempdir().expect("create temp dir");
    let missing = ModelAvailability::load(
        &empty.path().join("fraud_detection_model.json"),
        &empty.path().join("scaler.json"),
    );
    let status = model_status_internal(&missing);
    assert!(!status.available);
    assert!(status.reason.expect("reason").contains("fraud_detection_model.json"));
}

#[test]
fn analyze_flags_risky_sample_and_appends_history() {
    let (_tmp, model) = ready_model();

    let (response, history) = analyze(
        load_sample_internal(SamplePreset::Risky),
        &model,
        SessionHistory::default(),
    );
    let AnalysisResponse::Completed(report) = response else {
        panic!("risky sample should be analyzed");
    };
    assert_eq!(report.prediction.class, FraudClass::Fraud);
    assert_eq!(report.headline, "HIGH FRAUD RISK DETECTED");
    assert!((report.headline_probability - (28.0 / 30.0 + 0.8) / 2.0).abs() < 1e-9);
    assert_eq!(report.preview.assessment.score, 93);

    let (response, history) = analyze(load_sample_internal(SamplePreset::Safe), &model, history);
    let AnalysisResponse::Completed(report) = response else {
        panic!("safe sample should be analyzed");
    };
    assert_eq!(report.prediction.class, FraudClass::Legitimate);
    assert!((report.headline_probability - 0.85).abs() < 1e-9);

    let entries = history_internal(&history);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].id, report.entry_id);

    let stats = session_statistics_internal(&history);
    assert_eq!(stats.analyzed, 2);
    assert_eq!(stats.flagged, 1);
    assert!((stats.flagged_share - 50.0).abs() < 1e-9);

    let cleared = clear_history_internal(history);
    assert!(cleared.is_empty());
}

#[test]
fn blocking_violations_stop_analysis_without_touching_history() {
    let (_tmp, model) = ready_model();
    let (_, history) = analyze(load_sample_internal(SamplePreset::Safe), &model, SessionHistory::default());

    let invalid = LoanApplication {
        loan_amount: 0.0,
        credit_score: 900,
        ..LoanApplication::default()
    };
    let preview = preview_internal(&invalid, 0.05);
    assert!(preview.blocked);
    assert!(preview.payments.is_none());

    let (response, history) = analyze(invalid, &model, history);
    let AnalysisResponse::Blocked { violations } = response else {
        panic!("invalid application must be blocked");
    };
    assert_eq!(violations.len(), 2);
    assert!(violations.iter().all(|v| v.is_blocking()));
    assert_eq!(history.len(), 1);
}

#[test]
fn preview_serializes_for_the_form() {
    let preview = preview_internal(&load_sample_internal(SamplePreset::Risky), 0.05);
    let value = serde_json::to_value(&preview).expect("serialize preview");

    assert_eq!(value["blocked"], json!(false));
    assert_eq!(value["display_score"], json!(93));
    assert_eq!(value["profile"], json!("high"));
    assert_eq!(value["ltv_indicator"], json!("very_high"));
    assert_eq!(value["credit_indicator"], json!("poor"));
    assert!(value["payments"]["monthly_payment"].as_f64().expect("payment") > 0.0);
    assert_eq!(value["risk_factors"][0], json!("Extremely High LTV"));
}

#[test]
fn history_limit_drops_oldest_analyses() {
    let (_tmp, model) = ready_model();
    let mut history = SessionHistory::default();
    let mut ids = Vec::new();
    for _ in 0..4 {
        let (response, next) = analyze_internal(
            load_sample_internal(SamplePreset::Safe),
            &model,
            0.05,
            3,
            history,
        );
        if let AnalysisResponse::Completed(report) = response {
            ids.push(report.entry_id);
        }
        history = next;
    }

    let kept: Vec<String> = history_internal(&history).into_iter().map(|e| e.id).collect();
    assert_eq!(kept, ids[1..].to_vec());
}

#[tokio::test]
async fn export_history_writes_timestamped_csv() {
    let (_tmp, model) = ready_model();
    let export_dir = tempfile::tempdir().expect("create export dir");

    let empty = export_history_internal(&SessionHistory::default(), Some(export_dir.path())).await;
    assert!(empty.is_err());

    let (_, history) = analyze(load_sample_internal(SamplePreset::Risky), &model, SessionHistory::default());
    let export = export_history_internal(&history, Some(export_dir.path()))
        .await
        .expect("export history");

    assert_eq!(export.rows, 1);
    let path = export.path.expect("export path");
    let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(name.starts_with(EXPORT_FILE_PREFIX));
    assert!(name.ends_with(".csv"));
    assert_eq!(name.len(), "fraud_analysis_history_YYYYMMDD_HHMMSS.csv".len());
    assert_eq!(fs::read_to_string(&path).expect("read export"), export.csv);

    let in_memory = export_history_internal(&history, None).await.expect("export to memory");
    assert!(in_memory.path.is_none());
    assert_eq!(in_memory.csv.lines().count(), 2);
}

#[test]
fn settings_round_trip_and_merge_partial_updates() {
    let settings_dir = tempfile::tempdir().expect("create settings dir");

    let initial = load_settings_from_disk(settings_dir.path()).expect("load settings");
    assert_eq!(initial["historyLimit"], json!(1000));
    assert!(settings_dir.path().join("settings.json").exists());

    let saved = save_settings_to_disk(
        settings_dir.path(),
        json!({ "historyLimit": 50000, "annualInterestRate": 0.065 }),
    )
    .expect("save settings");
    assert_eq!(saved["historyLimit"], json!(10000));
    assert_eq!(saved["annualInterestRate"], json!(0.065));
    assert_eq!(saved["modelPath"], initial["modelPath"]);

    let effective = load_effective_settings(settings_dir.path()).expect("effective settings");
    assert_eq!(effective.history_limit, 10000);
    assert!((effective.annual_interest_rate - 0.065).abs() < 1e-12);
}

#[test]
fn legacy_percentage_rate_is_migrated_on_load() {
    let settings_dir = tempfile::tempdir().expect("create settings dir");
    common::write_json(
        &settings_dir.path().join("settings.json"),
        &json!({ "annualInterestRate": 6.0 }),
    );

    let migrated = load_settings_from_disk(settings_dir.path()).expect("load settings");
    assert_eq!(migrated["annualInterestRate"], json!(0.06));
    assert_eq!(migrated["schema_version"], json!(1));
}

#[test]
fn app_state_loads_artifacts_named_in_settings() {
    let artifacts_dir = tempfile::tempdir().expect("create artifacts dir");
    let (model_path, scaler_path) = common::write_artifacts(artifacts_dir.path(), &common::logistic_model());

    let settings_dir = tempfile::tempdir().expect("create settings dir");
    save_settings_to_disk(
        settings_dir.path(),
        json!({
            "modelPath": model_path.to_string_lossy(),
            "scalerPath": scaler_path.to_string_lossy(),
            "historyLimit": 25
        }),
    )
    .expect("save settings");

    let state = AppState::initialize(settings_dir.path().to_path_buf());
    let status = model_status_internal(&state.model);
    assert!(status.available);
    assert_eq!(status.algorithm.as_deref(), Some("Logistic Regression"));
    assert_eq!(state.settings.lock().expect("settings lock").history_limit, 25);
    assert!(state.history.lock().expect("history lock").is_empty());
}

fn shared_state(history_limit: usize) -> (TempDir, AppState) {
    let (tmp, model) = ready_model();
    let settings = EffectiveSettings {
        history_limit,
        ..EffectiveSettings::default()
    };
    let state = AppState::new(tmp.path().to_path_buf(), settings, model);
    (tmp, state)
}

#[test]
fn concurrent_submissions_all_reach_the_history() {
    let (_tmp, state) = shared_state(1000);

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..5 {
                    let response = state
                        .analyze(load_sample_internal(SamplePreset::Risky))
                        .expect("analyze");
                    assert!(matches!(response, AnalysisResponse::Completed(_)));
                }
            });
        }
    });

    let history = state.history_snapshot().expect("history snapshot");
    assert_eq!(history.len(), 40);
    assert_eq!(session_statistics_internal(&history).flagged, 40);
}

#[test]
fn settings_change_trims_history_while_analyses_run() {
    let (_tmp, state) = shared_state(1000);
    for _ in 0..30 {
        state.analyze(load_sample_internal(SamplePreset::Safe)).expect("analyze");
    }

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..10 {
                state.analyze(load_sample_internal(SamplePreset::Safe)).expect("analyze");
            }
        });
        scope.spawn(|| {
            let settings = EffectiveSettings {
                history_limit: 12,
                ..EffectiveSettings::default()
            };
            state.apply_settings(settings).expect("apply settings");
        });
    });

    assert_eq!(state.settings.lock().expect("settings lock").history_limit, 12);
    assert!(state.history_snapshot().expect("history snapshot").len() <= 12);

    state.clear_history().expect("clear history");
    assert!(state.history_snapshot().expect("history snapshot").is_empty());
}
