pub mod estimator;
pub mod settings;

use crate::models::application::LoanApplication;
use crate::models::history::SessionHistory;
use estimator::{analyze_internal, clear_history_internal, AnalysisResponse, ModelAvailability};
use settings::EffectiveSettings;
use std::path::PathBuf;
use std::sync::Mutex;

/// Desktop shell state. Artifacts are immutable after start-up; settings
/// and history sit behind mutexes shared by concurrent commands. Locks are
/// always taken settings first, then history.
pub struct AppState {
    pub settings_dir: PathBuf,
    pub model: ModelAvailability,
    pub settings: Mutex<EffectiveSettings>,
    pub history: Mutex<SessionHistory>,
}

impl AppState {
    pub fn new(settings_dir: PathBuf, settings: EffectiveSettings, model: ModelAvailability) -> Self {
        Self {
            settings_dir,
            model,
            settings: Mutex::new(settings),
            history: Mutex::new(SessionHistory::default()),
        }
    }

    /// Reads settings from `settings_dir` and loads the artifacts they name.
    pub fn initialize(settings_dir: PathBuf) -> Self {
        let settings = settings::load_effective_settings(&settings_dir).unwrap_or_else(|e| {
            log::warn!("using default settings: {e}");
            EffectiveSettings::default()
        });
        let model = ModelAvailability::load(&settings.model_path, &settings.scaler_path);
        Self::new(settings_dir, settings, model)
    }

    /// Runs one analysis with settings and history locked for the whole
    /// update, so concurrent submissions all land in the history.
    pub fn analyze(&self, application: LoanApplication) -> Result<AnalysisResponse, String> {
        let settings = self.settings.lock().map_err(|e| e.to_string())?;
        let mut history = self.history.lock().map_err(|e| e.to_string())?;
        let (response, updated) = analyze_internal(
            application,
            &self.model,
            settings.annual_interest_rate,
            settings.history_limit,
            std::mem::take(&mut *history),
        );
        *history = updated;
        Ok(response)
    }

    pub fn clear_history(&self) -> Result<(), String> {
        let mut history = self.history.lock().map_err(|e| e.to_string())?;
        *history = clear_history_internal(std::mem::take(&mut *history));
        Ok(())
    }

    pub fn history_snapshot(&self) -> Result<SessionHistory, String> {
        Ok(self.history.lock().map_err(|e| e.to_string())?.clone())
    }

    /// Swaps in new settings and trims the history to the new limit.
    pub fn apply_settings(&self, effective: EffectiveSettings) -> Result<(), String> {
        let mut settings = self.settings.lock().map_err(|e| e.to_string())?;
        let mut history = self.history.lock().map_err(|e| e.to_string())?;
        history.truncate(effective.history_limit);
        *settings = effective;
        Ok(())
    }
}
