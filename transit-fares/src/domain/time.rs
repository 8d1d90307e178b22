//! Service-day clock times.
//!
//! Transit schedules express times as seconds after midnight of the service
//! day. Trips that run past midnight keep counting, so "25:10:00" is a valid
//! time ten minutes past one on the following calendar day.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid clock time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Seconds since midnight of the service day.
///
/// # Examples
///
/// ```
/// use transit_fares::domain::ClockTime;
///
/// let t = ClockTime::parse_hms("08:15:30").unwrap();
/// assert_eq!(t.seconds(), 8 * 3600 + 15 * 60 + 30);
/// assert_eq!(t.to_string(), "08:15:30");
///
/// // Past-midnight service times are allowed
/// let late = ClockTime::parse_hms("25:10").unwrap();
/// assert_eq!(late.seconds(), 25 * 3600 + 10 * 60);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(i32);

impl ClockTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Creates a clock time from raw seconds.
    pub const fn from_seconds(seconds: i32) -> Self {
        Self(seconds)
    }

    /// Parses "HH:MM:SS" or "HH:MM". Hours may exceed 23.
    pub fn parse_hms(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');

        let hour_part = parts
            .next()
            .filter(|h| !h.is_empty() && h.len() <= 3)
            .ok_or_else(|| TimeError::new("expected HH:MM[:SS] format"))?;
        if !hour_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::new("invalid hour digits"));
        }
        let hour: i32 = hour_part
            .parse()
            .map_err(|_| TimeError::new("invalid hour digits"))?;

        let minute = parts
            .next()
            .and_then(|m| parse_two_digits(m.as_bytes()))
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let second = match parts.next() {
            Some(sec) => {
                parse_two_digits(sec.as_bytes()).ok_or_else(|| TimeError::new("invalid second digits"))?
            }
            None => 0,
        };
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM[:SS] format"));
        }

        Ok(Self(hour * 3600 + minute as i32 * 60 + second as i32))
    }

    /// Returns the raw number of seconds since midnight.
    pub const fn seconds(self) -> i32 {
        self.0
    }

    /// Returns this time shifted by `seconds`, saturating at the i32 range.
    pub fn plus_seconds(self, seconds: i32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Signed number of seconds from `earlier` to `self`.
    pub fn seconds_since(self, earlier: ClockTime) -> i64 {
        self.0 as i64 - earlier.0 as i64
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self})")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{:02}:{:02}:{:02}",
            total / 3600,
            (total / 60) % 60,
            total % 60
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        assert_eq!(ClockTime::parse_hms("00:00").unwrap().seconds(), 0);
        assert_eq!(ClockTime::parse_hms("00:30:00").unwrap().seconds(), 1800);
        assert_eq!(ClockTime::parse_hms("23:59:59").unwrap().seconds(), 86399);
        assert_eq!(ClockTime::parse_hms("7:05").unwrap().seconds(), 7 * 3600 + 300);
        assert_eq!(ClockTime::parse_hms("26:00:00").unwrap().seconds(), 26 * 3600);
    }

    #[test]
    fn reject_malformed_times() {
        assert!(ClockTime::parse_hms("").is_err());
        assert!(ClockTime::parse_hms("1430").is_err());
        assert!(ClockTime::parse_hms("14:3").is_err());
        assert!(ClockTime::parse_hms("14:60").is_err());
        assert!(ClockTime::parse_hms("14:30:61").is_err());
        assert!(ClockTime::parse_hms("14:30:00:00").is_err());
        assert!(ClockTime::parse_hms("ab:30").is_err());
        assert!(ClockTime::parse_hms("-1:30").is_err());
    }

    #[test]
    fn display_pads_components() {
        assert_eq!(ClockTime::from_seconds(3661).to_string(), "01:01:01");
        assert_eq!(ClockTime::from_seconds(25 * 3600).to_string(), "25:00:00");
        assert_eq!(format!("{:?}", ClockTime::from_seconds(60)), "ClockTime(00:01:00)");
    }

    #[test]
    fn arithmetic() {
        let t = ClockTime::from_seconds(1000);
        assert_eq!(t.plus_seconds(3600).seconds(), 4600);
        assert_eq!(ClockTime::from_seconds(i32::MAX).plus_seconds(1).seconds(), i32::MAX);
        assert_eq!(ClockTime::from_seconds(4000).seconds_since(t), 3000);
        assert_eq!(t.seconds_since(ClockTime::from_seconds(4000)), -3000);
    }

    #[test]
    fn ordering() {
        let a = ClockTime::from_seconds(10);
        let b = ClockTime::from_seconds(20);
        assert!(a < b);
        assert_eq!(a.min(b), a);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display output parses back to the same time.
        #[test]
        fn display_parse_roundtrip(secs in 0i32..(48 * 3600)) {
            let t = ClockTime::from_seconds(secs);
            prop_assert_eq!(ClockTime::parse_hms(&t.to_string()).unwrap(), t);
        }
    }
}
