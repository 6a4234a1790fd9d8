use tauri::State;

use crate::{timer::commands::controller_from_state, view::StopwatchSnapshot, AppState};

#[tauri::command]
pub async fn get_snapshot(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_snapshot().await)
}

#[tauri::command]
pub async fn toggle_view(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.toggle_view().await.map_err(|e| e.to_string())
}
