//! Participant domain type
//!
//! A user's enrollment in one challenge, holding that user's day-keyed
//! snapshot ledger.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::id::UserId;
use crate::day_label::DayLabel;

/// One day's completion percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub date_label: DayLabel,
    pub pct: f64,
}

/// A user enrolled in a challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub(crate) user_id: UserId,

    /// Insertion-ordered, at most one entry per day label
    #[serde(default)]
    pub(crate) daily_snapshots: Vec<DailySnapshot>,
}

impl Participant {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            daily_snapshots: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn daily_snapshots(&self) -> &[DailySnapshot] {
        &self.daily_snapshots
    }

    /// Snapshot recorded for `label`, if any
    pub fn snapshot(&self, label: DayLabel) -> Option<&DailySnapshot> {
        self.daily_snapshots.iter().find(|s| s.date_label == label)
    }

    pub fn days_recorded(&self) -> usize {
        self.daily_snapshots.len()
    }

    /// Insert or overwrite the snapshot for `label`
    ///
    /// Returns the previous percentage when an existing day was overwritten.
    /// An overwritten snapshot keeps its position in the ledger.
    pub(crate) fn upsert_snapshot(&mut self, label: DayLabel, pct: f64) -> Option<f64> {
        match self.daily_snapshots.iter_mut().find(|s| s.date_label == label) {
            Some(existing) => {
                debug!(user_id = %self.user_id, %label, old = existing.pct, new = pct, "Participant::upsert_snapshot: overwrite");
                Some(std::mem::replace(&mut existing.pct, pct))
            }
            None => {
                debug!(user_id = %self.user_id, %label, pct, "Participant::upsert_snapshot: append");
                self.daily_snapshots.push(DailySnapshot { date_label: label, pct });
                None
            }
        }
    }

    /// Mean of all recorded percentages, rounded half-up; 0 with no data
    pub fn average_pct(&self) -> u32 {
        if self.daily_snapshots.is_empty() {
            return 0;
        }
        let sum: f64 = self.daily_snapshots.iter().map(|s| s.pct).sum();
        let mean = sum / self.daily_snapshots.len() as f64;
        (mean + 0.5).floor().max(0.0) as u32
    }
}
