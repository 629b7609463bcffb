//! Payload validation
//!
//! Runs before the tracker is called. The tracker records whatever it is
//! handed; bounds on percentages and durations are enforced here.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Challenge, UserId};
use crate::error::ValidationError;

pub const MIN_DURATION_DAYS: u32 = 7;
pub const MAX_DURATION_DAYS: u32 = 365;
pub const MIN_PCT: f64 = 0.0;
pub const MAX_PCT: f64 = 100.0;

/// Percentage must be finite and within `MIN_PCT..=MAX_PCT`
pub fn validate_pct(pct: f64) -> Result<f64, ValidationError> {
    if !pct.is_finite() {
        return Err(ValidationError::PctNotFinite { pct });
    }
    if !(MIN_PCT..=MAX_PCT).contains(&pct) {
        return Err(ValidationError::PctOutOfRange { pct });
    }
    Ok(pct)
}

pub fn validate_duration(days: u32) -> Result<u32, ValidationError> {
    if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&days) {
        return Err(ValidationError::DurationOutOfRange {
            days,
            min: MIN_DURATION_DAYS,
            max: MAX_DURATION_DAYS,
        });
    }
    Ok(days)
}

/// Duration `challenge` would have after adding `days`, if still in bounds
pub fn validate_extension(challenge: &Challenge, days: u32) -> Result<u32, ValidationError> {
    validate_duration(challenge.duration_days().saturating_add(days))
}

/// Returns the trimmed name
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Returns the trimmed user id
pub fn validate_user_id(user_id: &str) -> Result<UserId, ValidationError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    Ok(UserId::from(trimmed))
}

/// Request to create a challenge
#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub name: String,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub participants: Vec<String>,
}

impl NewChallenge {
    /// Check every field and build the challenge
    pub fn validate(self) -> Result<Challenge, ValidationError> {
        debug!(name = %self.name, duration_days = self.duration_days, "NewChallenge::validate: called");
        let name = validate_name(&self.name)?;
        let duration_days = validate_duration(self.duration_days)?;
        let participants = self
            .participants
            .iter()
            .map(|u| validate_user_id(u))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Challenge::new(name, self.start_date, duration_days, participants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pct_bounds() {
        assert_eq!(validate_pct(0.0), Ok(0.0));
        assert_eq!(validate_pct(100.0), Ok(100.0));
        assert_eq!(validate_pct(-0.5), Err(ValidationError::PctOutOfRange { pct: -0.5 }));
        assert_eq!(validate_pct(100.1), Err(ValidationError::PctOutOfRange { pct: 100.1 }));
        assert!(matches!(validate_pct(f64::NAN), Err(ValidationError::PctNotFinite { .. })));
        assert!(matches!(
            validate_pct(f64::INFINITY),
            Err(ValidationError::PctNotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_duration_bounds() {
        assert_eq!(validate_duration(7), Ok(7));
        assert_eq!(validate_duration(365), Ok(365));
        assert!(validate_duration(6).is_err());
        assert!(validate_duration(366).is_err());
        assert!(validate_duration(0).is_err());
    }

    #[test]
    fn test_validate_extension() {
        let challenge = Challenge::new("Long", NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), 300, Vec::<UserId>::new());
        assert_eq!(validate_extension(&challenge, 65), Ok(365));
        assert_eq!(
            validate_extension(&challenge, 66),
            Err(ValidationError::DurationOutOfRange {
                days: 366,
                min: MIN_DURATION_DAYS,
                max: MAX_DURATION_DAYS
            })
        );
        assert!(validate_extension(&challenge, u32::MAX).is_err());
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Week Sprint "), Ok("Week Sprint".to_string()));
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_new_challenge_validate() {
        let request = NewChallenge {
            name: " Sprint ".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            duration_days: 14,
            participants: vec!["u1".to_string(), " u2 ".to_string(), "u1".to_string()],
        };

        let challenge = request.validate().unwrap();
        assert_eq!(challenge.name(), "Sprint");
        assert_eq!(challenge.participants().len(), 2);
        assert_eq!(challenge.participants()[1].user_id().as_str(), "u2");
    }

    #[test]
    fn test_new_challenge_rejects_short_duration() {
        let request = NewChallenge {
            name: "Sprint".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            duration_days: 3,
            participants: vec![],
        };

        assert!(matches!(
            request.validate(),
            Err(ValidationError::DurationOutOfRange { days: 3, .. })
        ));
    }
}
