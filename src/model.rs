//! The whole screen's state and the transitions users can trigger on it.

use anyhow::{anyhow, bail, Result};
use log::info;

use crate::{
    display::format_elapsed,
    overlay::Overlay,
    records::RecordStore,
    timer::LapEngine,
    view::{Controls, RecordRow, StopwatchSnapshot, ViewMode},
};

#[derive(Debug, Clone, Default)]
pub struct StopwatchModel {
    view: ViewMode,
    engine: LapEngine,
    records: RecordStore,
    overlay: Overlay,
    search_term: Option<String>,
}

impl StopwatchModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &LapEngine {
        &self.engine
    }

    #[cfg(test)]
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    #[cfg(test)]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[cfg(test)]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn toggle_view(&mut self) -> Result<()> {
        if self.overlay.is_open() {
            bail!("close the open dialog before switching views");
        }
        self.view = self.view.toggled();
        self.search_term = None;
        Ok(())
    }

    pub fn start(&mut self, now_ms: u64) -> Result<()> {
        self.engine.start(now_ms)?;
        info!("stopwatch started");
        Ok(())
    }

    pub fn lap(&mut self, now_ms: u64) -> Result<()> {
        self.engine.lap(now_ms)?;
        info!("lap {} recorded", self.engine.laps().len() - 1);
        Ok(())
    }

    pub fn stop(&mut self, now_ms: u64) -> Result<()> {
        self.engine.stop(now_ms)?;
        info!(
            "stopwatch stopped at {}",
            format_elapsed(self.engine.total_elapsed_ms())
        );
        Ok(())
    }

    pub fn resume(&mut self, now_ms: u64) -> Result<()> {
        self.engine.resume(now_ms)?;
        info!("stopwatch resumed");
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        self.engine.reset()?;
        info!("stopwatch reset");
        Ok(())
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.engine.tick(now_ms);
    }

    /// Opens the save sheet for lap row `lap_number`, capturing the duration
    /// shown on that row right now.
    pub fn select_lap(&mut self, lap_number: usize) -> Result<()> {
        let lap_ms = self
            .engine
            .lap_interval(lap_number)
            .ok_or_else(|| anyhow!("lap {lap_number} does not exist"))?;
        self.overlay.open_save(lap_number, lap_ms)
    }

    pub fn confirm_save(&mut self) -> Result<()> {
        self.overlay.confirm_save()
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.overlay.set_title(title)
    }

    pub fn confirm_title(&mut self) -> Result<()> {
        if let Some(pending) = self.overlay.confirm_title()? {
            if let Some(record) = self.records.insert(&pending.title, pending.lap_ms) {
                info!("saved record {:?} ({})", record.title, format_elapsed(record.lap_ms));
            }
        }
        Ok(())
    }

    pub fn cancel_overlay(&mut self) {
        self.overlay.cancel();
    }

    /// Opens the delete dialog for the record at `index` in the full list.
    pub fn select_record(&mut self, index: usize) -> Result<()> {
        let title = self
            .records
            .get(index)
            .map(|record| record.title.clone())
            .ok_or_else(|| anyhow!("record {index} does not exist"))?;
        self.overlay.open_delete(index, &title)
    }

    pub fn confirm_delete(&mut self) -> Result<()> {
        let index = self.overlay.confirm_delete()?;
        if let Some(record) = self.records.delete(index) {
            info!("deleted record {:?}", record.title);
        }
        Ok(())
    }

    pub fn search(&mut self, term: Option<&str>) {
        self.search_term = term.filter(|term| !term.is_empty()).map(str::to_string);
    }

    pub fn snapshot(&self) -> StopwatchSnapshot {
        let elapsed_ms = self.engine.total_elapsed_ms();
        let term = self.search_term.as_deref().unwrap_or_default();
        let records = self
            .records
            .search(term)
            .into_iter()
            .map(|(index, record)| RecordRow {
                index,
                id: record.id,
                title: record.title.clone(),
                lap_ms: record.lap_ms,
                display: format_elapsed(record.lap_ms),
            })
            .collect();

        StopwatchSnapshot {
            view: self.view,
            status: self.engine.status(),
            elapsed_ms,
            elapsed_display: format_elapsed(elapsed_ms),
            controls: Controls::for_status(self.engine.status()),
            laps: self.engine.lap_rows(),
            records,
            search_term: self.search_term.clone(),
            overlay: self.overlay.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerStatus;

    fn save_lap(model: &mut StopwatchModel, lap_number: usize, title: &str) {
        model.select_lap(lap_number).unwrap();
        model.confirm_save().unwrap();
        model.set_title(title).unwrap();
        model.confirm_title().unwrap();
    }

    fn record_titles(snapshot: &StopwatchSnapshot) -> Vec<&str> {
        snapshot
            .records
            .iter()
            .map(|row| row.title.as_str())
            .collect()
    }

    #[test]
    fn fresh_model_is_idle_on_timer_view() {
        let snapshot = StopwatchModel::new().snapshot();
        assert_eq!(snapshot.status, TimerStatus::Idle);
        assert_eq!(snapshot.view, ViewMode::Timer);
        assert_eq!(snapshot.overlay, Overlay::None);
        assert_eq!(snapshot.elapsed_display, "00:00:00");
    }

    #[test]
    fn saved_lap_survives_reset() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        model.lap(1_500).unwrap();
        model.stop(2_200).unwrap();

        save_lap(&mut model, 1, "Sprint");
        model.reset().unwrap();

        let snapshot = model.snapshot();
        assert_eq!(snapshot.status, TimerStatus::Idle);
        assert!(snapshot.laps.is_empty());
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].title, "Sprint");
        assert_eq!(snapshot.records[0].lap_ms, 1_500);
        assert_eq!(snapshot.records[0].display, "00:01:50");
    }

    #[test]
    fn saving_the_running_lap_captures_live_value() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        model.tick(420);
        model.select_lap(1).unwrap();
        model.tick(900);

        assert_eq!(
            model.overlay(),
            &Overlay::ConfirmSave {
                lap_number: 1,
                lap_ms: 420
            }
        );
    }

    #[test]
    fn empty_title_saves_nothing() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        model.select_lap(1).unwrap();
        model.confirm_save().unwrap();
        model.confirm_title().unwrap();

        assert!(model.records().is_empty());
        assert!(model.overlay().is_open());
    }

    #[test]
    fn selecting_missing_lap_fails() {
        let mut model = StopwatchModel::new();
        assert!(model.select_lap(1).is_err());
        assert!(!model.overlay().is_open());
    }

    #[test]
    fn search_filters_and_empty_term_shows_everything() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        save_lap(&mut model, 1, "Sprint");
        save_lap(&mut model, 1, "Jog");

        model.search(Some("sp"));
        assert_eq!(record_titles(&model.snapshot()), vec!["Sprint"]);

        model.search(Some("zz"));
        assert!(model.snapshot().records.is_empty());

        model.search(Some(""));
        assert_eq!(model.snapshot().search_term, None);
        assert_eq!(record_titles(&model.snapshot()), vec!["Jog", "Sprint"]);
    }

    #[test]
    fn delete_from_filtered_view_removes_the_right_record() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        save_lap(&mut model, 1, "A");
        save_lap(&mut model, 1, "B");
        save_lap(&mut model, 1, "Ab");

        model.search(Some("a"));
        let target = model.snapshot().records[1].clone();
        assert_eq!(target.title, "A");

        model.select_record(target.index).unwrap();
        assert_eq!(
            model.overlay(),
            &Overlay::ConfirmDelete {
                index: 2,
                title: "A".into()
            }
        );
        model.confirm_delete().unwrap();

        model.search(None);
        assert_eq!(record_titles(&model.snapshot()), vec!["Ab", "B"]);
    }

    #[test]
    fn delete_front_record() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        save_lap(&mut model, 1, "A");
        save_lap(&mut model, 1, "B");

        model.select_record(0).unwrap();
        model.confirm_delete().unwrap();
        assert_eq!(record_titles(&model.snapshot()), vec!["A"]);
    }

    #[test]
    fn cancel_delete_keeps_records() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        save_lap(&mut model, 1, "A");

        model.select_record(0).unwrap();
        model.cancel_overlay();
        assert_eq!(model.records().len(), 1);
        assert!(!model.overlay().is_open());
    }

    #[test]
    fn toggle_clears_search_and_is_blocked_by_dialogs() {
        let mut model = StopwatchModel::new();
        model.toggle_view().unwrap();
        assert_eq!(model.view(), ViewMode::Records);
        model.search(Some("x"));
        model.toggle_view().unwrap();
        assert_eq!(model.view(), ViewMode::Timer);
        assert_eq!(model.snapshot().search_term, None);

        model.start(0).unwrap();
        model.select_lap(1).unwrap();
        assert!(model.toggle_view().is_err());
        assert_eq!(model.view(), ViewMode::Timer);
    }

    #[test]
    fn snapshot_reports_total_and_controls() {
        let mut model = StopwatchModel::new();
        model.start(0).unwrap();
        model.lap(1_000).unwrap();
        model.tick(65_234);

        let snapshot = model.snapshot();
        assert_eq!(snapshot.elapsed_ms, 65_234);
        assert_eq!(snapshot.elapsed_display, "01:05:23");
        assert_eq!(snapshot.controls, Controls::for_status(TimerStatus::Running));
        assert_eq!(snapshot.laps.len(), 2);
    }
}
