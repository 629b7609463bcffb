//! Challenge aggregate
//!
//! A time-boxed competition. Owns its participants (and through them, every
//! snapshot), so one challenge is one load-modify-save unit.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::id::{ChallengeId, UserId};
use super::now_ms;
use super::participant::Participant;

/// A named, time-boxed competition among participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub(crate) id: ChallengeId,
    pub(crate) name: String,
    pub(crate) start_date: NaiveDate,
    pub(crate) duration_days: u32,

    /// Insertion order decides ties for the winner
    #[serde(default)]
    pub(crate) participants: Vec<Participant>,

    /// Creation timestamp (Unix milliseconds)
    pub(crate) created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub(crate) updated_at: i64,
}

impl Challenge {
    /// Create a challenge with no snapshots
    ///
    /// Repeated user IDs in `participants` collapse onto their first occurrence.
    pub fn new<I, U>(name: impl Into<String>, start_date: NaiveDate, duration_days: u32, participants: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        let name = name.into();
        let mut roster: Vec<Participant> = Vec::new();
        for user_id in participants {
            let user_id = user_id.into();
            if roster.iter().all(|p| p.user_id != user_id) {
                roster.push(Participant::new(user_id));
            }
        }
        debug!(%name, %start_date, duration_days, participants = roster.len(), "Challenge::new: called");

        let now = now_ms();
        Self {
            id: ChallengeId::new(&name),
            name,
            start_date,
            duration_days,
            participants: roster,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &ChallengeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.user_id == user_id)
    }

    pub(crate) fn participant_mut(&mut self, user_id: &UserId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| &p.user_id == user_id)
    }

    pub(crate) fn position(&self, user_id: &UserId) -> Option<usize> {
        self.participants.iter().position(|p| &p.user_id == user_id)
    }

    /// First day after the challenge: `start_date + duration_days`
    pub fn end_date(&self) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(u64::from(self.duration_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether `today` falls within `[start_date, end_date)`
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today < self.end_date()
    }

    /// Whole days left as of `today`
    pub fn days_remaining(&self, today: NaiveDate) -> u32 {
        let end = self.end_date();
        if today >= end {
            0
        } else if today < self.start_date {
            self.duration_days
        } else {
            u32::try_from((end - today).num_days()).unwrap_or(self.duration_days)
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = now_ms();
    }
}
