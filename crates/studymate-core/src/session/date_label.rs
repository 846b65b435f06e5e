//! Relative date labels for history lists.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// "Today", "Yesterday", or the calendar date of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum DateLabel {
    Today,
    Yesterday,
    On(NaiveDate),
}

impl DateLabel {
    /// Labels `instant` relative to `now`, comparing calendar days in `now`'s
    /// time zone.
    pub fn between<A: TimeZone, B: TimeZone>(instant: &DateTime<A>, now: &DateTime<B>) -> Self {
        let zone = now.timezone();
        let day = instant.with_timezone(&zone).date_naive();
        let today = now.date_naive();

        if day == today {
            Self::Today
        } else if today.checked_sub_days(Days::new(1)) == Some(day) {
            Self::Yesterday
        } else {
            Self::On(day)
        }
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("Today"),
            Self::Yesterday => f.write_str("Yesterday"),
            Self::On(date) => write!(f, "{}", date.format("%b %d, %Y")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_today_and_yesterday() {
        let now = utc("2026-03-04T18:00:00Z");
        assert_eq!(DateLabel::between(&utc("2026-03-04T00:10:00Z"), &now), DateLabel::Today);
        assert_eq!(
            DateLabel::between(&utc("2026-03-03T23:59:00Z"), &now),
            DateLabel::Yesterday
        );
    }

    #[test]
    fn test_older_dates_render_absolute() {
        let now = utc("2026-03-04T18:00:00Z");
        let label = DateLabel::between(&utc("2026-03-01T12:00:00Z"), &now);
        assert_eq!(label, DateLabel::On(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert_eq!(label.to_string(), "Mar 01, 2026");
    }

    #[test]
    fn test_days_compared_in_viewer_time_zone() {
        // 23:30 UTC on the 3rd is already the 4th at UTC+2.
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = utc("2026-03-04T08:00:00Z").with_timezone(&zone);
        assert_eq!(DateLabel::between(&utc("2026-03-03T23:30:00Z"), &now), DateLabel::Today);
    }
}
