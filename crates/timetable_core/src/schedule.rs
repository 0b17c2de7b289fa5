use std::collections::HashMap;

use chrono::NaiveDate;
use shared::domain::{Cohort, ScheduleEntry};

type SlotKey = (NaiveDate, Cohort, u8);
type NoteKey = (NaiveDate, Cohort);

/// Immutable schedule indexed by (date, cohort, period) at load time.
///
/// When several records share a key the first one in source order wins and the
/// rest are kept but never looked up.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    slots: HashMap<SlotKey, usize>,
    notes: HashMap<NoteKey, Vec<String>>,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        let mut slots = HashMap::new();
        let mut notes: HashMap<NoteKey, Vec<String>> = HashMap::new();
        let mut duplicates = 0usize;

        for (index, entry) in entries.iter().enumerate() {
            if entry.is_note() {
                notes
                    .entry((entry.date, entry.cohort.clone()))
                    .or_default()
                    .push(entry.comment.clone());
                continue;
            }
            let key = (entry.date, entry.cohort.clone(), entry.period);
            if slots.contains_key(&key) {
                duplicates += 1;
            } else {
                slots.insert(key, index);
            }
        }

        if duplicates > 0 {
            tracing::debug!(duplicates, "schedule has repeated slots; first record wins");
        }

        Self {
            entries,
            slots,
            notes,
        }
    }

    pub fn lookup(&self, date: NaiveDate, cohort: &Cohort, period: u8) -> Option<&ScheduleEntry> {
        self.slots
            .get(&(date, cohort.clone(), period))
            .and_then(|index| self.entries.get(*index))
    }

    /// Daily notes for one cohort, in source order.
    pub fn notes(&self, date: NaiveDate, cohort: &Cohort) -> &[String] {
        self.notes
            .get(&(date, cohort.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
