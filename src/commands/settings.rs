use crate::analysis::payments::DEFAULT_ANNUAL_INTEREST_RATE;
use crate::classifier::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};
use crate::models::history::DEFAULT_HISTORY_LIMIT;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 1;
const SETTINGS_FILE: &str = "settings.json";

const MIN_HISTORY_LIMIT: u64 = 10;
const MAX_HISTORY_LIMIT: u64 = 10_000;
const MAX_ANNUAL_INTEREST_RATE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub annual_interest_rate: f64,
    pub history_limit: usize,
    pub export_directory: Option<PathBuf>,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_FILE),
            scaler_path: PathBuf::from(DEFAULT_SCALER_FILE),
            annual_interest_rate: DEFAULT_ANNUAL_INTEREST_RATE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            export_directory: None,
        }
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_settings(state: tauri::State<'_, crate::commands::AppState>) -> Result<Value, String> {
    load_settings_from_disk(&state.settings_dir)
}

/// Persists the merged settings. Rate, history limit and export directory
/// apply immediately; artifact paths are read at the next launch.
#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn save_settings(
    state: tauri::State<'_, crate::commands::AppState>,
    settings: Value,
) -> Result<Value, String> {
    let saved = save_settings_to_disk(&state.settings_dir, settings)?;
    state.apply_settings(effective_settings(&saved))?;
    Ok(saved)
}

pub fn load_effective_settings(settings_dir: &Path) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(settings_dir)?;
    Ok(effective_settings(&settings))
}

pub fn effective_settings(settings: &Value) -> EffectiveSettings {
    let defaults = EffectiveSettings::default();
    let path_or = |key: &str, fallback: PathBuf| {
        settings
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(fallback)
    };

    EffectiveSettings {
        model_path: path_or("modelPath", defaults.model_path),
        scaler_path: path_or("scalerPath", defaults.scaler_path),
        annual_interest_rate: settings
            .get("annualInterestRate")
            .and_then(Value::as_f64)
            .unwrap_or(defaults.annual_interest_rate)
            .clamp(0.0, MAX_ANNUAL_INTEREST_RATE),
        history_limit: settings
            .get("historyLimit")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_HISTORY_LIMIT as u64)
            .clamp(MIN_HISTORY_LIMIT, MAX_HISTORY_LIMIT) as usize,
        export_directory: settings
            .get("exportDirectory")
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from),
    }
}

pub fn load_settings_from_disk(settings_dir: &Path) -> Result<Value, String> {
    let path = settings_path(settings_dir);
    ensure_settings_dir(settings_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("settings.json is not valid JSON, using defaults: {e}");
            json!({})
        })
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(settings_dir: &Path, settings: Value) -> Result<Value, String> {
    let path = settings_path(settings_dir);
    ensure_settings_dir(settings_dir)?;

    let mut merged = load_settings_from_disk(settings_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

fn settings_path(settings_dir: &Path) -> PathBuf {
    settings_dir.join(SETTINGS_FILE)
}

fn ensure_settings_dir(settings_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(settings_dir)
        .map_err(|e| format!("Failed to create settings directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    deep_merge_defaults(&mut out, &defaults);

    if version < 1 {
        migrate_rate_from_percentage(&mut out);
    }

    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "modelPath": DEFAULT_MODEL_FILE,
        "scalerPath": DEFAULT_SCALER_FILE,
        "annualInterestRate": DEFAULT_ANNUAL_INTEREST_RATE,
        "historyLimit": DEFAULT_HISTORY_LIMIT,
        "exportDirectory": ""
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

/// Unversioned files stored the rate as a percentage (5 meaning 5%).
fn migrate_rate_from_percentage(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };
    if let Some(rate) = obj.get("annualInterestRate").and_then(Value::as_f64) {
        if rate > 1.0 {
            obj.insert("annualInterestRate".to_string(), json!(rate / 100.0));
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(
        obj,
        "historyLimit",
        MIN_HISTORY_LIMIT,
        MAX_HISTORY_LIMIT,
        DEFAULT_HISTORY_LIMIT as u64,
    );
    clamp_f64(
        obj,
        "annualInterestRate",
        0.0,
        MAX_ANNUAL_INTEREST_RATE,
        DEFAULT_ANNUAL_INTEREST_RATE,
    );

    ensure_string(obj, "modelPath", DEFAULT_MODEL_FILE, false);
    ensure_string(obj, "scalerPath", DEFAULT_SCALER_FILE, false);
    ensure_string(obj, "exportDirectory", "", true);
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn clamp_f64(map: &mut Map<String, Value>, key: &str, min: f64, max: f64, default: f64) {
    let raw = map
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn ensure_string(map: &mut Map<String, Value>, key: &str, default: &str, allow_empty: bool) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| allow_empty || !value.is_empty())
        .unwrap_or(default)
        .to_string();
    map.insert(key.to_string(), json!(value));
}
