mod clock;
mod display;
mod model;
mod overlay;
mod records;
mod settings;
mod timer;
mod view;

use std::sync::Arc;

use log::warn;
use overlay::commands::{
    cancel_overlay, confirm_record_title, confirm_save, select_lap, set_record_title,
};
use records::commands::{confirm_delete, search_records, select_record};
use settings::{SettingsStore, StopwatchSettings};
use tauri::{Manager, RunEvent, State};
use timer::{
    commands::{lap_timer, reset_timer, resume_timer, start_timer, stop_timer},
    StopwatchController,
};
use view::commands::{get_snapshot, toggle_view};

pub(crate) struct AppState {
    pub(crate) stopwatch: StopwatchController,
    pub(crate) settings: SettingsStore,
}

#[tauri::command]
fn get_settings(state: State<AppState>) -> Result<StopwatchSettings, String> {
    Ok(state.settings.stopwatch())
}

#[tauri::command]
async fn set_settings(
    settings: StopwatchSettings,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .settings
        .update_stopwatch(settings.clone())
        .map_err(|e| e.to_string())?;

    state
        .stopwatch
        .set_tick_interval(settings.tick_interval())
        .await;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Lapwatch starting up...");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let config_dir = app
                    .path()
                    .app_config_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;

                let settings_store = SettingsStore::new(config_dir.join("settings.json"))?;
                let tick_interval = settings_store.stopwatch().tick_interval();

                let stopwatch =
                    StopwatchController::new(Arc::new(app.handle().clone()), tick_interval);

                app.manage(AppState {
                    stopwatch,
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_snapshot,
            toggle_view,
            start_timer,
            lap_timer,
            stop_timer,
            resume_timer,
            reset_timer,
            select_lap,
            confirm_save,
            set_record_title,
            confirm_record_title,
            cancel_overlay,
            select_record,
            confirm_delete,
            search_records,
            get_settings,
            set_settings,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let RunEvent::Exit = event {
            match app_handle.try_state::<AppState>() {
                Some(state) => {
                    let stopwatch = state.stopwatch.clone();
                    tauri::async_runtime::block_on(async move { stopwatch.shutdown().await });
                }
                None => warn!("exiting before the stopwatch was initialised"),
            }
        }
    });
}
