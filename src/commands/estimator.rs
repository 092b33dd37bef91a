use crate::analysis::heuristic::assess_risk;
use crate::analysis::indicators::{
    credit_indicator, ltv_indicator, risk_breakdown, risk_meter, CreditIndicator, LtvIndicator,
    RiskBreakdown, RiskMeter,
};
use crate::analysis::payments::{amortize, debt_to_income, DebtToIncome, PaymentSchedule};
use crate::analysis::validation::{has_blocking, validate_application};
use crate::classifier::TrainedArtifacts;
use crate::errors::{FraudLensError, Result as FraudResult};
use crate::models::application::{LoanApplication, SamplePreset, FEATURE_NAMES};
use crate::models::assessment::{RiskAssessment, RiskProfile, Violation};
use crate::models::history::{AnalysisHistoryEntry, SessionHistory, SessionStatistics};
use crate::models::prediction::Prediction;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "desktop")]
use crate::commands::AppState;

pub const EXPORT_FILE_PREFIX: &str = "fraud_analysis_history";

/// Classifier availability, settled once at start-up.
#[derive(Debug, Clone)]
pub enum ModelAvailability {
    Ready(Arc<TrainedArtifacts>),
    Unavailable { reason: String },
}

impl ModelAvailability {
    pub fn load(model_path: &Path, scaler_path: &Path) -> Self {
        match TrainedArtifacts::load(model_path, scaler_path) {
            Ok(artifacts) => ModelAvailability::Ready(Arc::new(artifacts)),
            Err(e) => {
                log::error!("prediction disabled: {e}");
                ModelAvailability::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub available: bool,
    pub algorithm: Option<String>,
    pub reason: Option<String>,
}

/// Live panel contents, recomputed on every form change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationPreview {
    pub violations: Vec<Violation>,
    pub blocked: bool,
    pub assessment: RiskAssessment,
    pub display_score: u32,
    pub profile: RiskProfile,
    pub risk_factors: Vec<&'static str>,
    pub payments: Option<PaymentSchedule>,
    pub debt_to_income: Option<DebtToIncome>,
    pub ltv_indicator: LtvIndicator,
    pub credit_indicator: CreditIndicator,
    pub meter: RiskMeter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub preview: ApplicationPreview,
    pub prediction: Prediction,
    pub headline: &'static str,
    pub headline_probability: f64,
    pub recommendation: &'static str,
    pub breakdown: RiskBreakdown,
    pub entry_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Completed(Box<AnalysisReport>),
    Blocked { violations: Vec<Violation> },
    ModelUnavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryExport {
    pub csv: String,
    pub rows: usize,
    pub path: Option<PathBuf>,
}

pub fn model_status_internal(model: &ModelAvailability) -> ModelStatus {
    match model {
        ModelAvailability::Ready(artifacts) => ModelStatus {
            available: true,
            algorithm: Some(artifacts.algorithm().to_string()),
            reason: None,
        },
        ModelAvailability::Unavailable { reason } => ModelStatus {
            available: false,
            algorithm: None,
            reason: Some(reason.clone()),
        },
    }
}

pub fn preview_internal(application: &LoanApplication, annual_rate: f64) -> ApplicationPreview {
    let violations = validate_application(application);
    let assessment = assess_risk(application);

    ApplicationPreview {
        blocked: has_blocking(&violations),
        violations,
        display_score: assessment.display_score(),
        profile: assessment.profile(),
        risk_factors: assessment.labels(),
        assessment,
        payments: amortize(
            application.loan_amount,
            application.loan_tenure_months,
            annual_rate,
        ),
        debt_to_income: debt_to_income(application, annual_rate),
        ltv_indicator: ltv_indicator(application.loan_to_value_ratio),
        credit_indicator: credit_indicator(application.credit_score),
        meter: risk_meter(application),
    }
}

/// Runs the full analysis and threads the history through. Rejected
/// requests hand the history back untouched.
pub fn analyze_internal(
    application: LoanApplication,
    model: &ModelAvailability,
    annual_rate: f64,
    history_limit: usize,
    mut history: SessionHistory,
) -> (AnalysisResponse, SessionHistory) {
    let preview = preview_internal(&application, annual_rate);
    if preview.blocked {
        log::info!("analysis blocked by {} violation(s)", preview.violations.len());
        let violations = preview.violations.into_iter().filter(Violation::is_blocking).collect();
        return (AnalysisResponse::Blocked { violations }, history);
    }

    let artifacts = match model {
        ModelAvailability::Ready(artifacts) => artifacts,
        ModelAvailability::Unavailable { reason } => {
            let reason = reason.clone();
            return (AnalysisResponse::ModelUnavailable { reason }, history);
        }
    };

    let prediction = artifacts.predict(&application);
    let breakdown = risk_breakdown(&application);
    let entry = AnalysisHistoryEntry::new(application, prediction, preview.assessment.score);
    let entry_id = entry.id.clone();
    history.push(entry, history_limit);

    log::info!(
        "analysis {entry_id}: {} ({:.1}% fraud probability)",
        prediction.class.verdict(),
        prediction.fraud_probability * 100.0
    );

    let report = AnalysisReport {
        preview,
        headline: prediction.headline(),
        headline_probability: prediction.headline_probability(),
        recommendation: prediction.recommendation(),
        prediction,
        breakdown,
        entry_id,
    };
    (AnalysisResponse::Completed(Box::new(report)), history)
}

pub fn history_internal(history: &SessionHistory) -> Vec<AnalysisHistoryEntry> {
    history.to_vec()
}

pub fn clear_history_internal(mut history: SessionHistory) -> SessionHistory {
    history.clear();
    history
}

pub fn session_statistics_internal(history: &SessionHistory) -> SessionStatistics {
    SessionStatistics::from_history(history)
}

pub fn load_sample_internal(preset: SamplePreset) -> LoanApplication {
    preset.application()
}

pub fn export_file_name(at: chrono::DateTime<chrono::Local>) -> String {
    format!("{EXPORT_FILE_PREFIX}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

pub fn history_to_csv(history: &SessionHistory) -> FraudResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["id", "analyzed_at"];
    header.extend(FEATURE_NAMES);
    header.extend(["prediction", "fraud_probability", "heuristic_score"]);
    writer.write_record(&header).map_err(FraudLensError::export)?;

    for entry in history.entries() {
        let mut record = vec![entry.id.clone(), entry.analyzed_at.clone()];
        record.extend(
            entry
                .application
                .to_feature_vector()
                .iter()
                .map(|value| value.to_string()),
        );
        record.push(entry.prediction.class.verdict().to_string());
        record.push(format!("{:.4}", entry.prediction.fraud_probability));
        record.push(entry.heuristic_score.to_string());
        writer.write_record(&record).map_err(FraudLensError::export)?;
    }

    let bytes = writer.into_inner().map_err(FraudLensError::export)?;
    String::from_utf8(bytes).map_err(FraudLensError::export)
}

/// Renders the history as CSV and, when a directory is given, also writes
/// it there under a timestamped name.
pub async fn export_history_internal(
    history: &SessionHistory,
    directory: Option<&Path>,
) -> FraudResult<HistoryExport> {
    if history.is_empty() {
        return Err(FraudLensError::export("no analyses in this session"));
    }

    let csv = history_to_csv(history)?;
    let path = match directory {
        Some(dir) => {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| FraudLensError::io(dir, e))?;
            let path = dir.join(export_file_name(chrono::Local::now()));
            tokio::fs::write(&path, &csv)
                .await
                .map_err(|e| FraudLensError::io(&path, e))?;
            log::info!("exported {} analyses to {}", history.len(), path.display());
            Some(path)
        }
        None => None,
    };

    Ok(HistoryExport {
        csv,
        rows: history.len(),
        path,
    })
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn model_status(state: tauri::State<'_, AppState>) -> Result<ModelStatus, String> {
    Ok(model_status_internal(&state.model))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn preview_application(
    application: LoanApplication,
    state: tauri::State<'_, AppState>,
) -> Result<ApplicationPreview, String> {
    let rate = state.settings.lock().map_err(|e| e.to_string())?.annual_interest_rate;
    Ok(preview_internal(&application, rate))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn analyze_application(
    application: LoanApplication,
    state: tauri::State<'_, AppState>,
) -> Result<AnalysisResponse, String> {
    state.analyze(application)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn load_sample(preset: SamplePreset) -> Result<LoanApplication, String> {
    Ok(load_sample_internal(preset))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_history(state: tauri::State<'_, AppState>) -> Result<Vec<AnalysisHistoryEntry>, String> {
    Ok(history_internal(&state.history_snapshot()?))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn clear_history(state: tauri::State<'_, AppState>) -> Result<(), String> {
    state.clear_history()
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_session_statistics(
    state: tauri::State<'_, AppState>,
) -> Result<SessionStatistics, String> {
    Ok(session_statistics_internal(&state.history_snapshot()?))
}

/// Falls back to the configured export directory when none is chosen.
#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn export_history(
    directory: Option<String>,
    state: tauri::State<'_, AppState>,
) -> Result<HistoryExport, String> {
    let history = state.history_snapshot()?;
    let directory = match directory {
        Some(dir) => Some(PathBuf::from(dir)),
        None => state
            .settings
            .lock()
            .map_err(|e| e.to_string())?
            .export_directory
            .clone(),
    };
    export_history_internal(&history, directory.as_deref())
        .await
        .map_err(|e| e.to_string())
}
