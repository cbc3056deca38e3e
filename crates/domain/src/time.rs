//! Time and timestamp helpers.
//!
//! Timestamps travel as `YYYY-MM-DD HH:MM:SS` text (UTC, whole seconds) both
//! on the wire and in storage. Use-cases read the current time through a
//! [`Clock`] so tests can pin it.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// UTC timestamp with whole-second precision.
pub type Timestamp = DateTime<Utc>;

/// Text layout used for every persisted and serialized timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Return the current UTC time, truncated to the second.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(0)
}

/// Render a timestamp in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp rendered by [`format`].
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `text` does not follow [`TIMESTAMP_FORMAT`].
pub fn parse(text: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

/// Source of "now" for use-cases.
pub trait Clock: Send + Sync {
    /// Current time, whole seconds.
    fn now(&self) -> Timestamp;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start.trunc_subsecs(0)),
        }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += chrono::Duration::seconds(seconds);
    }

    pub fn set(&self, ts: Timestamp) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = ts.trunc_subsecs(0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serde adapter for `#[serde(with = "crate::time::text")]` fields.
pub mod text {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Timestamp;

    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(ts))
    }

    /// # Errors
    ///
    /// Fails when the value is not a string in the timestamp layout.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}
