//! HabitChallenge - daily progress ledger for group habit challenges
//!
//! Participants in a time-boxed challenge record one completion percentage
//! per day. Days are labelled in a single platform timezone so "today" means
//! the same thing for everyone. Averages and the leader are derived from the
//! recorded snapshots.
//!
//! # Modules
//!
//! - [`domain`] - Challenge, Participant and snapshot types
//! - [`day_label`] - `YYYY-MM-DD` labels and the timezone-anchored labeler
//! - [`tracker`] - Recording, averaging and picking the winner
//! - [`validation`] - Bounds checks run before the tracker
//! - [`store`] - One JSON document per challenge, locked load-modify-save
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use habitchallenge::{Challenge, ChallengeProgressTracker, UserId, ZoneDayLabeler};
//!
//! let tracker = ChallengeProgressTracker::new(ZoneDayLabeler::default());
//! let mut challenge = Challenge::new("Week Sprint", start, 7, ["p1", "p2"]);
//! tracker.record_daily_pct(&mut challenge, &UserId::from("p1"), 100.0, None)?;
//! let winner = tracker.winner(&challenge);
//! ```

pub mod cli;
pub mod config;
pub mod day_label;
pub mod domain;
pub mod error;
pub mod store;
pub mod tracker;
pub mod validation;

pub use config::Config;
pub use day_label::{DayLabel, DayLabeler, FixedDayLabeler, ZoneDayLabeler};
pub use domain::{Challenge, ChallengeId, DailySnapshot, Participant, UserId};
pub use error::{StoreError, TrackerError, ValidationError};
pub use store::ChallengeStore;
pub use tracker::{ChallengeProgressTracker, Standing, Winner};
pub use validation::NewChallenge;
