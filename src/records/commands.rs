use tauri::State;

use crate::{timer::commands::controller_from_state, view::StopwatchSnapshot, AppState};

#[tauri::command]
pub async fn search_records(
    state: State<'_, AppState>,
    term: Option<String>,
) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.search(term).await.map_err(|e| e.to_string())
}

/// Long-press on a record row.
#[tauri::command]
pub async fn select_record(
    state: State<'_, AppState>,
    index: usize,
) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .select_record(index)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn confirm_delete(state: State<'_, AppState>) -> Result<StopwatchSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.confirm_delete().await.map_err(|e| e.to_string())
}
