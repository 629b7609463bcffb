//! ChallengeProgressTracker
//!
//! Maintains each participant's day-keyed snapshot ledger and derives
//! averages and the current leader from it. Operations are synchronous and
//! in-memory; callers serialize mutations of the same challenge (see
//! [`crate::store::ChallengeStore::update`]).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::day_label::{DayLabel, DayLabeler};
use crate::domain::{Challenge, Participant, UserId};
use crate::error::TrackerError;

/// Leader of a challenge and their average percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub user_id: UserId,
    pub avg: u32,
}

/// One participant's row in a challenge summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub user_id: UserId,
    pub avg: u32,
    pub days_recorded: usize,
}

/// Records daily percentages and ranks participants
#[derive(Clone)]
pub struct ChallengeProgressTracker {
    labeler: Arc<dyn DayLabeler>,
}

impl std::fmt::Debug for ChallengeProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeProgressTracker").finish_non_exhaustive()
    }
}

impl ChallengeProgressTracker {
    pub fn new(labeler: impl DayLabeler + 'static) -> Self {
        Self {
            labeler: Arc::new(labeler),
        }
    }

    pub fn with_labeler(labeler: Arc<dyn DayLabeler>) -> Self {
        Self { labeler }
    }

    /// Label the tracker would use for a recording made right now
    pub fn today(&self) -> DayLabel {
        self.labeler.today()
    }

    /// Enroll `user_id`, or return the existing enrollment untouched
    pub fn add_participant<'a>(&self, challenge: &'a mut Challenge, user_id: impl Into<UserId>) -> &'a Participant {
        let user_id = user_id.into();
        debug!(challenge = %challenge.id, %user_id, "ChallengeProgressTracker::add_participant: called");

        let idx = match challenge.position(&user_id) {
            Some(idx) => {
                debug!(%user_id, "ChallengeProgressTracker::add_participant: already enrolled");
                idx
            }
            None => {
                info!(challenge = %challenge.id, %user_id, "Participant added");
                challenge.participants.push(Participant::new(user_id));
                challenge.touch();
                challenge.participants.len() - 1
            }
        };
        &challenge.participants[idx]
    }

    /// Record `pct` for `user_id` on `day_label` (today if omitted)
    ///
    /// A second recording for the same day overwrites the first. Returns the
    /// day label that was written.
    pub fn record_daily_pct(
        &self,
        challenge: &mut Challenge,
        user_id: &UserId,
        pct: f64,
        day_label: Option<DayLabel>,
    ) -> Result<DayLabel, TrackerError> {
        debug!(challenge = %challenge.id, %user_id, pct, ?day_label, "ChallengeProgressTracker::record_daily_pct: called");

        let challenge_id = challenge.id.clone();
        let participant = challenge
            .participant_mut(user_id)
            .ok_or_else(|| TrackerError::ParticipantNotFound {
                user_id: user_id.clone(),
            })?;

        let label = day_label.unwrap_or_else(|| self.labeler.today());
        let previous = participant.upsert_snapshot(label, pct);
        challenge.touch();

        info!(challenge = %challenge_id, %user_id, %label, pct, ?previous, "Daily percentage recorded");
        Ok(label)
    }

    /// Rounded mean of every snapshot `user_id` has; 0 for unknown users
    pub fn average_pct(&self, challenge: &Challenge, user_id: &UserId) -> u32 {
        challenge.participant(user_id).map(Participant::average_pct).unwrap_or(0)
    }

    /// Participant with the strictly highest average; ties keep the earliest
    pub fn winner(&self, challenge: &Challenge) -> Option<Winner> {
        debug!(challenge = %challenge.id, "ChallengeProgressTracker::winner: called");
        let mut leader: Option<Winner> = None;
        for participant in &challenge.participants {
            let avg = participant.average_pct();
            if leader.as_ref().is_none_or(|current| avg > current.avg) {
                leader = Some(Winner {
                    user_id: participant.user_id.clone(),
                    avg,
                });
            }
        }
        leader
    }

    /// Average and day count for every participant, in enrollment order
    pub fn standings(&self, challenge: &Challenge) -> Vec<Standing> {
        challenge
            .participants
            .iter()
            .map(|p| Standing {
                user_id: p.user_id.clone(),
                avg: p.average_pct(),
                days_recorded: p.days_recorded(),
            })
            .collect()
    }

    /// Drop `user_id` and their ledger; `None` if they were not enrolled
    pub fn remove_participant(&self, challenge: &mut Challenge, user_id: &UserId) -> Option<Participant> {
        debug!(challenge = %challenge.id, %user_id, "ChallengeProgressTracker::remove_participant: called");
        let idx = challenge.position(user_id)?;
        let removed = challenge.participants.remove(idx);
        challenge.touch();
        info!(challenge = %challenge.id, %user_id, days = removed.days_recorded(), "Participant removed");
        Some(removed)
    }

    /// Lengthen the challenge by `days`, returning the new duration
    pub fn extend_duration(&self, challenge: &mut Challenge, days: u32) -> Result<u32, TrackerError> {
        debug!(challenge = %challenge.id, days, "ChallengeProgressTracker::extend_duration: called");
        if days == 0 {
            return Err(TrackerError::InvalidExtension { days });
        }
        challenge.duration_days = challenge.duration_days.saturating_add(days);
        challenge.touch();
        info!(challenge = %challenge.id, duration_days = challenge.duration_days, "Challenge extended");
        Ok(challenge.duration_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_label::FixedDayLabeler;
    use chrono::NaiveDate;

    fn day(s: &str) -> DayLabel {
        s.parse().unwrap()
    }

    fn tracker_on(label: &str) -> ChallengeProgressTracker {
        ChallengeProgressTracker::new(FixedDayLabeler::new(day(label)))
    }

    fn challenge(users: &[&str]) -> Challenge {
        Challenge::new(
            "Week Sprint",
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            7,
            users.iter().copied(),
        )
    }

    #[test]
    fn test_add_participant_is_idempotent() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&[]);

        tracker.add_participant(&mut c, "a");
        tracker
            .record_daily_pct(&mut c, &UserId::from("a"), 60.0, None)
            .unwrap();

        let again = tracker.add_participant(&mut c, "a");
        assert_eq!(again.days_recorded(), 1);
        assert_eq!(c.participants().len(), 1);
    }

    #[test]
    fn test_add_participant_appends_in_order() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a"]);
        tracker.add_participant(&mut c, "b");
        tracker.add_participant(&mut c, "c");

        let ids: Vec<&str> = c.participants().iter().map(|p| p.user_id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_same_day_overwrites() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a"]);
        let a = UserId::from("a");

        tracker.record_daily_pct(&mut c, &a, 40.0, None).unwrap();
        tracker.record_daily_pct(&mut c, &a, 90.0, None).unwrap();

        let p = c.participant(&a).unwrap();
        assert_eq!(p.days_recorded(), 1);
        assert_eq!(p.snapshot(day("2025-01-06")).unwrap().pct, 90.0);
    }

    #[test]
    fn test_record_returns_derived_label() {
        let tracker = tracker_on("2025-01-09");
        let mut c = challenge(&["a"]);

        let label = tracker
            .record_daily_pct(&mut c, &UserId::from("a"), 10.0, None)
            .unwrap();
        assert_eq!(label.to_string(), "2025-01-09");

        let explicit = tracker
            .record_daily_pct(&mut c, &UserId::from("a"), 20.0, Some(day("2025-01-07")))
            .unwrap();
        assert_eq!(explicit.to_string(), "2025-01-07");
        assert_eq!(c.participant(&UserId::from("a")).unwrap().days_recorded(), 2);
    }

    #[test]
    fn test_record_accepts_out_of_range_values() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a"]);
        let a = UserId::from("a");

        tracker.record_daily_pct(&mut c, &a, 150.0, None).unwrap();
        assert_eq!(c.participant(&a).unwrap().daily_snapshots()[0].pct, 150.0);
    }

    #[test]
    fn test_record_unknown_participant_leaves_ledgers_alone() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a", "b"]);
        tracker
            .record_daily_pct(&mut c, &UserId::from("a"), 75.0, None)
            .unwrap();
        let before = c.participants().to_vec();

        let err = tracker
            .record_daily_pct(&mut c, &UserId::from("ghost"), 50.0, None)
            .unwrap_err();

        assert!(matches!(err, TrackerError::ParticipantNotFound { ref user_id } if user_id.as_str() == "ghost"));
        assert_eq!(c.participants(), before.as_slice());
    }

    #[test]
    fn test_average_pct() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a"]);
        let a = UserId::from("a");
        tracker.record_daily_pct(&mut c, &a, 100.0, Some(day("2025-01-06"))).unwrap();
        tracker.record_daily_pct(&mut c, &a, 100.0, Some(day("2025-01-07"))).unwrap();
        tracker.record_daily_pct(&mut c, &a, 50.0, Some(day("2025-01-08"))).unwrap();

        assert_eq!(tracker.average_pct(&c, &a), 83);
    }

    #[test]
    fn test_average_pct_includes_days_outside_window() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a"]);
        let a = UserId::from("a");
        tracker.record_daily_pct(&mut c, &a, 100.0, Some(day("2024-12-01"))).unwrap();
        tracker.record_daily_pct(&mut c, &a, 0.0, Some(day("2025-01-06"))).unwrap();

        assert_eq!(tracker.average_pct(&c, &a), 50);
    }

    #[test]
    fn test_average_pct_unknown_or_empty_is_zero() {
        let tracker = tracker_on("2025-01-06");
        let c = challenge(&["a"]);
        assert_eq!(tracker.average_pct(&c, &UserId::from("a")), 0);
        assert_eq!(tracker.average_pct(&c, &UserId::from("nobody")), 0);
    }

    #[test]
    fn test_winner_without_participants() {
        let tracker = tracker_on("2025-01-06");
        assert_eq!(tracker.winner(&challenge(&[])), None);
    }

    #[test]
    fn test_winner_tie_goes_to_first_inserted() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a", "b"]);
        tracker.record_daily_pct(&mut c, &UserId::from("b"), 70.0, None).unwrap();
        tracker.record_daily_pct(&mut c, &UserId::from("a"), 70.0, None).unwrap();

        let winner = tracker.winner(&c).unwrap();
        assert_eq!(winner.user_id.as_str(), "a");
        assert_eq!(winner.avg, 70);
    }

    #[test]
    fn test_winner_with_no_data_is_first_participant() {
        let tracker = tracker_on("2025-01-06");
        let c = challenge(&["a", "b"]);
        assert_eq!(
            tracker.winner(&c),
            Some(Winner {
                user_id: UserId::from("a"),
                avg: 0
            })
        );
    }

    #[test]
    fn test_winner_later_participant_strictly_higher() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a", "b", "c"]);
        tracker.record_daily_pct(&mut c, &UserId::from("a"), 40.0, None).unwrap();
        tracker.record_daily_pct(&mut c, &UserId::from("b"), 90.0, None).unwrap();
        tracker.record_daily_pct(&mut c, &UserId::from("c"), 90.0, None).unwrap();

        assert_eq!(tracker.winner(&c).unwrap().user_id.as_str(), "b");
    }

    #[test]
    fn test_winner_serializes_with_user_id_and_avg() {
        let winner = Winner {
            user_id: UserId::from("p1"),
            avg: 100,
        };
        assert_eq!(
            serde_json::to_value(&winner).unwrap(),
            serde_json::json!({ "userId": "p1", "avg": 100 })
        );
    }

    #[test]
    fn test_standings() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a", "b"]);
        tracker.record_daily_pct(&mut c, &UserId::from("a"), 30.0, None).unwrap();

        let rows = tracker.standings(&c);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].avg, 30);
        assert_eq!(rows[0].days_recorded, 1);
        assert_eq!(rows[1].avg, 0);
        assert_eq!(rows[1].days_recorded, 0);
    }

    #[test]
    fn test_remove_participant() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&["a", "b", "c"]);
        tracker.record_daily_pct(&mut c, &UserId::from("b"), 55.0, None).unwrap();

        let removed = tracker.remove_participant(&mut c, &UserId::from("b")).unwrap();
        assert_eq!(removed.days_recorded(), 1);

        let ids: Vec<&str> = c.participants().iter().map(|p| p.user_id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(tracker.remove_participant(&mut c, &UserId::from("b")).is_none());
    }

    #[test]
    fn test_extend_duration() {
        let tracker = tracker_on("2025-01-06");
        let mut c = challenge(&[]);

        assert_eq!(tracker.extend_duration(&mut c, 7).unwrap(), 14);
        assert_eq!(c.end_date(), NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        assert!(matches!(
            tracker.extend_duration(&mut c, 0),
            Err(TrackerError::InvalidExtension { days: 0 })
        ));
        assert_eq!(c.duration_days(), 14);
    }
}
