use tauri::State;

use crate::{timer::StopwatchController, view::StopwatchSnapshot, AppState};

pub(crate) fn controller_from_state(state: &State<'_, AppState>) -> StopwatchController {
    state.stopwatch.clone()
}

#[tauri::command]
pub async fn start_timer(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.start().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn lap_timer(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.lap().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn stop_timer(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.stop().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn resume_timer(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.resume().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn reset_timer(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.reset().await.map_err(|e| e.to_string())
}
