//! Wire timestamp representation.
//!
//! Mirrors the protobuf well-known `Timestamp`: whole seconds since the Unix
//! epoch plus a non-negative nanosecond fraction, restricted to years
//! 0001..=9999.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// 0001-01-01T00:00:00Z
const MIN_VALID_SECONDS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
const MAX_VALID_SECONDS: i64 = 253_402_300_799;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// Point in time with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// Reasons a stored instant cannot be expressed as a [`Timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    SecondsOutOfRange(i64),
    NanosOutOfRange(i32),
}

impl Display for TimestampError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SecondsOutOfRange(seconds) => write!(
                f,
                "timestamp seconds {seconds} outside valid range [{MIN_VALID_SECONDS}, {MAX_VALID_SECONDS}]"
            ),
            Self::NanosOutOfRange(nanos) => {
                write!(f, "timestamp nanos {nanos} outside valid range [0, 1e9)")
            }
        }
    }
}

impl Error for TimestampError {}

impl Timestamp {
    /// Builds a validated timestamp.
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, TimestampError> {
        if !(0..NANOS_PER_SECOND).contains(&i64::from(nanos)) {
            return Err(TimestampError::NanosOutOfRange(nanos));
        }
        if !(MIN_VALID_SECONDS..=MAX_VALID_SECONDS).contains(&seconds) {
            return Err(TimestampError::SecondsOutOfRange(seconds));
        }
        Ok(Self { seconds, nanos })
    }

    /// Converts Unix epoch milliseconds, the storage representation.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, TimestampError> {
        let seconds = millis.div_euclid(MILLIS_PER_SECOND);
        // rem_euclid keeps the fraction in [0, 999], so the product fits i32.
        let nanos = (millis.rem_euclid(MILLIS_PER_SECOND) * NANOS_PER_MILLI) as i32;
        Self::new(seconds, nanos)
    }

    /// Returns the instant as Unix epoch milliseconds, truncating sub-milli
    /// precision.
    pub fn epoch_millis(&self) -> i64 {
        self.seconds * MILLIS_PER_SECOND + i64::from(self.nanos) / NANOS_PER_MILLI
    }
}
