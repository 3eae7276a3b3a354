//! Entry timestamps.

use chrono::{DateTime, FixedOffset, Local, TimeZone};

/// Source of the time an entry is written at.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Process-local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Format a timestamp as `Ddd Mon DD HH:MM:SS TZ YYYY`.
///
/// chrono does not know zone abbreviations, so a zero offset prints as
/// `UTC` and anything else as its numeric offset.
pub fn format_entry_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let date = date.fixed_offset();
    let zone = if date.offset().local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        date.format("%:z").to_string()
    };

    format!("{} {} {}", date.format("%a %b %d %H:%M:%S"), zone, date.format("%Y"))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_format_utc_date() {
        let date = Utc.with_ymd_and_hms(2023, 8, 24, 9, 5, 3).unwrap();
        assert_eq!(format_entry_date(&date), "Thu Aug 24 09:05:03 UTC 2023");
    }

    #[test]
    fn test_format_offset_date() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 1, 7, 23, 59, 0).unwrap();
        assert_eq!(format_entry_date(&date), "Sun Jan 07 23:59:00 +02:00 2024");
    }

    #[test]
    fn test_fixed_clock_returns_its_instant() {
        let date = Utc.with_ymd_and_hms(2020, 2, 29, 12, 0, 0).unwrap().fixed_offset();
        assert_eq!(FixedClock(date).now(), date);
    }
}
