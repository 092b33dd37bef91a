pub mod analysis;
pub mod charts;
pub mod classifier;
pub mod commands;
pub mod errors;
pub mod evaluation;
pub mod explain;
pub mod models;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::{
        estimator::{
            analyze_application, clear_history, export_history, get_history,
            get_session_statistics, load_sample, model_status, preview_application,
        },
        settings::{get_settings, save_settings},
        AppState,
    };
    use tauri::Manager;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let settings_dir = app.path().app_data_dir()?;
            app.manage(AppState::initialize(settings_dir));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            model_status,
            preview_application,
            analyze_application,
            load_sample,
            get_history,
            clear_history,
            export_history,
            get_session_statistics,
            get_settings,
            save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
