use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Wall-clock source for `{time}` and `{date}` replies.
pub trait Clock: Send + Sync {
    /// Local time in the bot's zone.
    fn now(&self) -> NaiveDateTime;
}

/// Current UTC time shifted into an IANA time zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parse an IANA zone name such as `Europe/Moscow`.
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(Self::new)
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Clock, FixedClock, ZonedClock};

    #[test]
    fn zoned_clock_parses_iana_names() {
        assert!(ZonedClock::from_name("Europe/Moscow").is_some());
        assert!(ZonedClock::from_name(" UTC ").is_some());
        assert!(ZonedClock::from_name("Mars/Olympus").is_none());
    }

    #[test]
    fn fixed_clock_returns_its_instant() {
        let instant = NaiveDate::from_ymd_opt(2026, 2, 23)
            .and_then(|d| d.and_hms_opt(7, 5, 0))
            .expect("valid datetime");
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
