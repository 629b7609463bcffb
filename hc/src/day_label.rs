//! Calendar day labels anchored to a single platform timezone
//!
//! Every participant shares the same notion of "today", regardless of where
//! they are. A [`DayLabeler`] turns an instant into the `YYYY-MM-DD` label of
//! the day it falls on in the platform timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::TrackerError;

/// Platform timezone used when nothing else is configured
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

const LABEL_FORMAT: &str = "%Y-%m-%d";

/// A calendar day, rendered as a zero-padded `YYYY-MM-DD` string
///
/// The rendered form sorts lexicographically in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayLabel(NaiveDate);

impl DayLabel {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayLabel {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LABEL_FORMAT))
    }
}

impl FromStr for DayLabel {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TrackerError::InvalidDayLabel { label: s.to_string() };

        // chrono accepts unpadded fields, labels must be exactly YYYY-MM-DD
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
        if !well_formed {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(s, LABEL_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl Serialize for DayLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Maps an instant to the day label it belongs to
pub trait DayLabeler: Send + Sync {
    /// Label of the day containing `at`
    fn label_for(&self, at: DateTime<Utc>) -> DayLabel;

    /// Label of the current day
    fn today(&self) -> DayLabel {
        self.label_for(Utc::now())
    }
}

/// Labels days as observed in one fixed IANA timezone
#[derive(Debug, Clone, Copy)]
pub struct ZoneDayLabeler {
    tz: Tz,
}

impl ZoneDayLabeler {
    pub fn new(tz: Tz) -> Self {
        debug!(%tz, "ZoneDayLabeler::new: called");
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for ZoneDayLabeler {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl DayLabeler for ZoneDayLabeler {
    fn label_for(&self, at: DateTime<Utc>) -> DayLabel {
        DayLabel(at.with_timezone(&self.tz).date_naive())
    }
}

/// Always reports the same day; for tests and replaying history
#[derive(Debug, Clone, Copy)]
pub struct FixedDayLabeler {
    label: DayLabel,
}

impl FixedDayLabeler {
    pub fn new(label: DayLabel) -> Self {
        Self { label }
    }
}

impl DayLabeler for FixedDayLabeler {
    fn label_for(&self, _at: DateTime<Utc>) -> DayLabel {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let label: DayLabel = "2025-01-06".parse().unwrap();
        assert_eq!(label.date(), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(label.to_string(), "2025-01-06");
    }

    #[test]
    fn test_parse_rejects_unpadded_and_garbage() {
        for bad in ["2025-1-06", "2025-01-6", "25-01-06", "2025/01/06", "2025-02-30", "", "+2025-01-0"] {
            let result = bad.parse::<DayLabel>();
            assert!(
                matches!(result, Err(TrackerError::InvalidDayLabel { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_labels_sort_chronologically_as_strings() {
        let a: DayLabel = "2024-12-31".parse().unwrap();
        let b: DayLabel = "2025-01-01".parse().unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let label: DayLabel = "2025-03-09".parse().unwrap();
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, "\"2025-03-09\"");

        let back: DayLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label);

        assert!(serde_json::from_str::<DayLabel>("\"2025-3-9\"").is_err());
    }

    #[test]
    fn test_los_angeles_midnight_standard_time() {
        let labeler = ZoneDayLabeler::default();
        // 07:59 UTC is 23:59 PST the previous day
        assert_eq!(labeler.label_for(utc(2025, 1, 7, 7, 59)).to_string(), "2025-01-06");
        // 08:00 UTC is midnight PST
        assert_eq!(labeler.label_for(utc(2025, 1, 7, 8, 0)).to_string(), "2025-01-07");
    }

    #[test]
    fn test_los_angeles_midnight_daylight_time() {
        let labeler = ZoneDayLabeler::default();
        // PDT is UTC-7, so the day flips at 07:00 UTC
        assert_eq!(labeler.label_for(utc(2025, 7, 4, 6, 59)).to_string(), "2025-07-03");
        assert_eq!(labeler.label_for(utc(2025, 7, 4, 7, 0)).to_string(), "2025-07-04");
    }

    #[test]
    fn test_other_timezone() {
        let labeler = ZoneDayLabeler::new(chrono_tz::Asia::Tokyo);
        assert_eq!(labeler.label_for(utc(2025, 1, 6, 15, 0)).to_string(), "2025-01-07");
    }

    #[test]
    fn test_fixed_labeler_ignores_instant() {
        let label: DayLabel = "2025-02-14".parse().unwrap();
        let labeler = FixedDayLabeler::new(label);
        assert_eq!(labeler.label_for(utc(1999, 1, 1, 0, 0)), label);
        assert_eq!(labeler.today(), label);
    }
}
