//! Domain types for HabitChallenge
//!
//! Challenge owns its participants, each participant owns its snapshot
//! ledger. Everything serializes to the camelCase document the store writes.

mod challenge;
mod id;
mod participant;

pub use challenge::Challenge;
pub use id::{ChallengeId, UserId, generate_id};
pub use participant::{DailySnapshot, Participant};

/// Current time in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
