use anyhow::{bail, Result};
use serde::Serialize;

/// The single modal surface that can be open over the main screen.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Overlay {
    #[default]
    None,
    /// Bottom sheet asking whether to save a lap.
    ConfirmSave { lap_number: usize, lap_ms: u64 },
    /// Dialog collecting the record title.
    TitleEntry {
        lap_number: usize,
        lap_ms: u64,
        title: String,
    },
    /// Dialog confirming removal of a saved record.
    ConfirmDelete { index: usize, title: String },
}

/// A titled lap ready to go into the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub title: String,
    pub lap_ms: u64,
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }

    pub fn open_save(&mut self, lap_number: usize, lap_ms: u64) -> Result<()> {
        self.ensure_closed()?;
        *self = Overlay::ConfirmSave { lap_number, lap_ms };
        Ok(())
    }

    pub fn confirm_save(&mut self) -> Result<()> {
        match *self {
            Overlay::ConfirmSave { lap_number, lap_ms } => {
                *self = Overlay::TitleEntry {
                    lap_number,
                    lap_ms,
                    title: String::new(),
                };
                Ok(())
            }
            _ => bail!("no lap is waiting to be saved"),
        }
    }

    pub fn set_title(&mut self, text: &str) -> Result<()> {
        match self {
            Overlay::TitleEntry { title, .. } => {
                *title = text.to_string();
                Ok(())
            }
            _ => bail!("title entry is not open"),
        }
    }

    /// Closes the title dialog and hands back the record to store. An empty
    /// title keeps the dialog open and yields nothing.
    pub fn confirm_title(&mut self) -> Result<Option<PendingRecord>> {
        let pending = match self {
            Overlay::TitleEntry { title, .. } if title.is_empty() => return Ok(None),
            Overlay::TitleEntry { title, lap_ms, .. } => PendingRecord {
                title: std::mem::take(title),
                lap_ms: *lap_ms,
            },
            _ => bail!("title entry is not open"),
        };
        *self = Overlay::None;
        Ok(Some(pending))
    }

    pub fn open_delete(&mut self, index: usize, title: &str) -> Result<()> {
        self.ensure_closed()?;
        *self = Overlay::ConfirmDelete {
            index,
            title: title.to_string(),
        };
        Ok(())
    }

    /// Closes the delete dialog and returns the record position to remove.
    pub fn confirm_delete(&mut self) -> Result<usize> {
        match *self {
            Overlay::ConfirmDelete { index, .. } => {
                *self = Overlay::None;
                Ok(index)
            }
            _ => bail!("no record is waiting to be deleted"),
        }
    }

    /// Closes whatever is open, discarding its scratch fields.
    pub fn cancel(&mut self) {
        *self = Overlay::None;
    }

    fn ensure_closed(&self) -> Result<()> {
        if self.is_open() {
            bail!("another dialog is already open");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_flow_walks_through_both_dialogs() {
        let mut overlay = Overlay::default();
        overlay.open_save(2, 1_500).unwrap();
        assert_eq!(
            overlay,
            Overlay::ConfirmSave {
                lap_number: 2,
                lap_ms: 1_500
            }
        );

        overlay.confirm_save().unwrap();
        overlay.set_title("Sprint").unwrap();
        let pending = overlay.confirm_title().unwrap();
        assert_eq!(
            pending,
            Some(PendingRecord {
                title: "Sprint".into(),
                lap_ms: 1_500
            })
        );
        assert_eq!(overlay, Overlay::None);
    }

    #[test]
    fn empty_title_keeps_dialog_open() {
        let mut overlay = Overlay::default();
        overlay.open_save(1, 10).unwrap();
        overlay.confirm_save().unwrap();

        assert_eq!(overlay.confirm_title().unwrap(), None);
        assert!(matches!(overlay, Overlay::TitleEntry { .. }));
    }

    #[test]
    fn cancel_discards_scratch_state() {
        let mut overlay = Overlay::default();
        overlay.open_save(1, 10).unwrap();
        overlay.confirm_save().unwrap();
        overlay.set_title("half typed").unwrap();
        overlay.cancel();
        assert_eq!(overlay, Overlay::None);

        overlay.open_save(3, 30).unwrap();
        overlay.confirm_save().unwrap();
        assert_eq!(
            overlay,
            Overlay::TitleEntry {
                lap_number: 3,
                lap_ms: 30,
                title: String::new()
            }
        );
    }

    #[test]
    fn overlays_do_not_stack() {
        let mut overlay = Overlay::default();
        overlay.open_delete(0, "B").unwrap();
        assert!(overlay.open_save(1, 10).is_err());
        assert!(overlay.open_delete(1, "A").is_err());
        assert_eq!(
            overlay,
            Overlay::ConfirmDelete {
                index: 0,
                title: "B".into()
            }
        );
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let mut overlay = Overlay::default();
        assert!(overlay.confirm_save().is_err());
        assert!(overlay.set_title("x").is_err());
        assert!(overlay.confirm_title().is_err());
        assert!(overlay.confirm_delete().is_err());

        overlay.open_save(1, 10).unwrap();
        assert!(overlay.confirm_delete().is_err());
        assert!(overlay.set_title("x").is_err());
    }

    #[test]
    fn delete_flow_returns_captured_index() {
        let mut overlay = Overlay::default();
        overlay.open_delete(4, "Warmup").unwrap();
        assert_eq!(overlay.confirm_delete().unwrap(), 4);
        assert!(!overlay.is_open());
    }

    #[test]
    fn serializes_with_a_kind_tag() {
        let overlay = Overlay::ConfirmSave {
            lap_number: 2,
            lap_ms: 700,
        };
        let json = serde_json::to_value(&overlay).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "confirmSave", "lapNumber": 2, "lapMs": 700 })
        );
    }
}
