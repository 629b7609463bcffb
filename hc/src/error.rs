//! Error types for the challenge tracker, validation and storage

use thiserror::Error;

use crate::domain::{ChallengeId, UserId};

/// Errors raised by tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Participant not found: {user_id}")]
    ParticipantNotFound { user_id: UserId },

    #[error("Invalid day label '{label}', expected YYYY-MM-DD")]
    InvalidDayLabel { label: String },

    #[error("Cannot extend a challenge by {days} days")]
    InvalidExtension { days: u32 },
}

/// Errors raised by payload validation before the tracker is invoked
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Percentage must be a finite number, got {pct}")]
    PctNotFinite { pct: f64 },

    #[error("Percentage {pct} is outside 0..=100")]
    PctOutOfRange { pct: f64 },

    #[error("Duration {days} days is outside {min}..={max}")]
    DurationOutOfRange { days: u32, min: u32, max: u32 },

    #[error("Challenge name must not be empty")]
    EmptyName,

    #[error("User id must not be empty")]
    EmptyUserId,
}

/// Errors raised by the challenge store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Challenge not found: {id}")]
    NotFound { id: ChallengeId },

    #[error("Challenge already exists: {id}")]
    AlreadyExists { id: ChallengeId },

    #[error("Invalid challenge id '{id}'")]
    InvalidId { id: ChallengeId },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Whether the request itself was wrong rather than the store failing
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::InvalidId { .. } | StoreError::Tracker(_) | StoreError::Validation(_)
        )
    }
}
