//! Human-readable version ages
//!
//! The elapsed time between a release and now is decomposed on the calendar
//! (whole months first, then days down to seconds) rather than by dividing a
//! total number of seconds, so "1 year" means the same date one year later.

use std::fmt;

use chrono::{DateTime, Datelike, Months, Utc};
use serde::Serialize;

/// Elapsed time split into calendar units, every field non-negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDelta {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl CalendarDelta {
    /// Computes the delta between two instants, order-independent
    pub fn between(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };

        let mut total_months =
            (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
        let mut anchor = add_months(from, total_months);
        // Day clamping or a later time-of-day can overshoot by one month.
        while total_months > 0 && anchor.map_or(true, |at| at > to) {
            total_months -= 1;
            anchor = add_months(from, total_months);
        }
        let total_months = total_months.max(0);
        let anchor = anchor.unwrap_or(from);

        let rest = (to - anchor).num_seconds().max(0);
        Self {
            years: (total_months / 12) as u32,
            months: (total_months % 12) as u32,
            days: (rest / 86_400) as u32,
            hours: (rest % 86_400 / 3_600) as u32,
            minutes: (rest % 3_600 / 60) as u32,
            seconds: (rest % 60) as u32,
        }
    }

    fn units(&self) -> [(u32, &'static str); 6] {
        [
            (self.years, "year"),
            (self.months, "month"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ]
    }
}

fn add_months(at: DateTime<Utc>, months: i32) -> Option<DateTime<Utc>> {
    if months < 0 {
        return None;
    }
    at.checked_add_months(Months::new(months as u32))
}

impl fmt::Display for CalendarDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .units()
            .iter()
            .filter(|(value, _)| *value != 0)
            .map(|(value, unit)| {
                let plural = if *value == 1 { "" } else { "s" };
                format!("{} {}{}", value, unit, plural)
            })
            .collect();

        match parts.split_last() {
            None => write!(f, "0 seconds"),
            Some((last, [])) => write!(f, "{}", last),
            Some((last, rest)) => write!(f, "{} and {}", rest.join(", "), last),
        }
    }
}

/// Age of a version as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Age {
    pub text: String,
    pub is_anniversary: bool,
}

/// True when `release` and `now` fall on the same month and day of month
pub fn is_anniversary(now: DateTime<Utc>, release: DateTime<Utc>) -> bool {
    now.month() == release.month() && now.day() == release.day()
}

/// Renders how long ago `release` happened, relative to `now`
pub fn humanize(now: DateTime<Utc>, release: DateTime<Utc>) -> Age {
    Age {
        text: CalendarDelta::between(release, now).to_string(),
        is_anniversary: is_anniversary(now, release),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_one_year_anniversary() {
        let release = utc(2023, 3, 14, 12, 56, 18);
        let now = utc(2024, 3, 14, 12, 56, 18);

        let age = humanize(now, release);

        assert_eq!(age.text, "1 year");
        assert!(age.is_anniversary);
    }

    #[test]
    fn test_zero_delta_is_zero_seconds() {
        let t = utc(2024, 1, 1, 0, 0, 0);

        let age = humanize(t, t);

        assert_eq!(age.text, "0 seconds");
        assert!(age.is_anniversary);
    }

    #[test]
    fn test_sub_second_delta_is_zero_seconds() {
        let t = utc(2024, 1, 1, 0, 0, 0);
        assert_eq!(humanize(t + Duration::milliseconds(400), t).text, "0 seconds");
    }

    #[test]
    fn test_all_units_joined_with_commas_and_and() {
        let release = utc(2020, 1, 1, 0, 0, 0);
        let now = utc(2022, 3, 4, 5, 6, 7);

        assert_eq!(
            humanize(now, release).text,
            "2 years, 2 months, 3 days, 5 hours, 6 minutes and 7 seconds"
        );
    }

    #[test]
    fn test_two_units_use_and_only() {
        let release = utc(2020, 1, 1, 0, 0, 0);
        let now = utc(2021, 1, 1, 0, 0, 1);

        assert_eq!(humanize(now, release).text, "1 year and 1 second");
    }

    #[test]
    fn test_singular_units() {
        let release = utc(2020, 1, 1, 0, 0, 0);
        let now = utc(2021, 2, 2, 1, 1, 1);

        assert_eq!(
            humanize(now, release).text,
            "1 year, 1 month, 1 day, 1 hour, 1 minute and 1 second"
        );
    }

    #[test]
    fn test_zero_units_are_omitted() {
        let release = utc(2020, 1, 1, 0, 0, 0);
        let now = utc(2020, 1, 3, 0, 5, 0);

        assert_eq!(humanize(now, release).text, "2 days and 5 minutes");
    }

    #[test]
    fn test_borrows_from_months_when_time_of_day_is_earlier() {
        let release = utc(2023, 3, 14, 12, 0, 0);
        let now = utc(2024, 3, 14, 11, 0, 0);

        let delta = CalendarDelta::between(release, now);

        assert_eq!(delta.years, 0);
        assert_eq!(delta.months, 11);
        // Feb 14 12:00 -> Mar 14 11:00 in a leap year.
        assert_eq!(delta.days, 28);
        assert_eq!(delta.hours, 23);
    }

    #[test]
    fn test_month_end_release_clamps_day() {
        let release = utc(2023, 1, 31, 0, 0, 0);
        let now = utc(2023, 3, 1, 0, 0, 0);

        let delta = CalendarDelta::between(release, now);

        // Jan 31 + 1 month clamps to Feb 28, one day before Mar 1.
        assert_eq!((delta.months, delta.days), (1, 1));
    }

    #[test]
    fn test_future_release_reports_magnitude() {
        let release = utc(2024, 3, 16, 0, 0, 0);
        let now = utc(2024, 3, 14, 0, 0, 0);

        assert_eq!(humanize(now, release).text, "2 days");
    }

    #[test]
    fn test_anniversary_ignores_year_and_time() {
        let release = utc(2011, 11, 18, 0, 0, 0);

        assert!(is_anniversary(utc(2024, 11, 18, 23, 59, 59), release));
        assert!(!is_anniversary(utc(2024, 11, 19, 0, 0, 0), release));
        assert!(!is_anniversary(utc(2024, 12, 18, 0, 0, 0), release));
    }

    #[test]
    fn test_output_never_has_zero_unit_or_dangling_separator() {
        let release = utc(2019, 7, 31, 23, 59, 59);
        let mut now = release;
        for step in 0..500 {
            now = now + Duration::seconds(step * 7919 + 13);
            let text = humanize(now, release).text;

            assert!(!text.starts_with("0 ") || text == "0 seconds", "{}", text);
            assert!(!text.contains(" 0 "), "{}", text);
            assert!(!text.ends_with(',') && !text.ends_with("and"), "{}", text);
            assert!(!text.contains(", and"), "{}", text);
        }
    }

    #[test]
    fn test_delta_fields_recompose_to_now() {
        let release = utc(2012, 2, 29, 6, 30, 0);
        let now = utc(2024, 10, 17, 3, 15, 42);

        let d = CalendarDelta::between(release, now);
        let anchor = release
            .checked_add_months(Months::new(d.years * 12 + d.months))
            .unwrap();
        let rebuilt = anchor
            + Duration::days(d.days as i64)
            + Duration::hours(d.hours as i64)
            + Duration::minutes(d.minutes as i64)
            + Duration::seconds(d.seconds as i64);

        assert_eq!(rebuilt, now);
    }
}
