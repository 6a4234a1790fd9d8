use tauri::State;

use crate::{timer::commands::controller_from_state, view::StopwatchSnapshot, AppState};

/// Tap on a lap row.
#[tauri::command]
pub async fn select_lap(
    state: State<'_, AppState>,
    lap_number: usize,
) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .select_lap(lap_number)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn confirm_save(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.confirm_save().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn set_record_title(
    state: State<'_, AppState>,
    title: String,
) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.set_title(title).await.map_err(|e| e.to_string())
}

/// Save in the title dialog. The frontend sends the input's current value so
/// the saved title never depends on a `set_record_title` call still in flight.
#[tauri::command]
pub async fn confirm_record_title(
    state: State<'_, AppState>,
    title: Option<String>,
) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .confirm_title(title)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cancel_overlay(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.cancel_overlay().await.map_err(|e| e.to_string())
}
