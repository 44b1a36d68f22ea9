use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Named time range used to scope period summaries.
///
/// Day and Week are open-ended windows starting at a local midnight, so
/// future-dated entries are included. Month is calendar-month membership.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewWindow {
    Day,
    Week,
    #[default]
    Month,
}

/// Calendar days covered by the week window, counted back from today.
pub const WEEK_LOOKBACK_DAYS: i64 = 7;

impl ViewWindow {
    pub const ALL: [ViewWindow; 3] = [ViewWindow::Day, ViewWindow::Week, ViewWindow::Month];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewWindow::Day => "day",
            ViewWindow::Week => "week",
            ViewWindow::Month => "month",
        }
    }

    /// Whether `timestamp` falls inside this window as seen from `now`.
    pub fn contains<Tz: TimeZone>(self, timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        match self {
            ViewWindow::Day | ViewWindow::Week => *timestamp >= window_start(self, now),
            ViewWindow::Month => {
                let local = timestamp.with_timezone(&now.timezone());
                local.year() == now.year() && local.month() == now.month()
            }
        }
    }
}

impl fmt::Display for ViewWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewWindow {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "today" => Ok(ViewWindow::Day),
            "week" => Ok(ViewWindow::Week),
            "month" => Ok(ViewWindow::Month),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown window `{other}` (expected day, week or month)"
            ))),
        }
    }
}

/// First instant of the local calendar day `date` in `tz`, as UTC.
///
/// When local midnight does not exist (DST gap) the first valid local time of
/// that day is used; when it is ambiguous the earlier instant wins.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..96)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Lower bound of `window` relative to `now`.
///
/// For Month this is the first instant of the current calendar month; the
/// month window additionally excludes later months, see [`ViewWindow::contains`].
pub fn window_start<Tz: TimeZone>(window: ViewWindow, now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let today = now.date_naive();
    let anchor = match window {
        ViewWindow::Day => today,
        ViewWindow::Week => today - Duration::days(WEEK_LOOKBACK_DAYS),
        ViewWindow::Month => today.with_day(1).unwrap_or(today),
    };
    start_of_day(&tz, anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        ist().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn day_window_starts_at_local_midnight() {
        let now = local(2024, 3, 15, 10, 0);
        // 2024-03-15 00:00 IST == 2024-03-14 18:30 UTC
        assert_eq!(window_start(ViewWindow::Day, &now), utc(2024, 3, 14, 18, 30));
        assert!(ViewWindow::Day.contains(&utc(2024, 3, 14, 18, 30), &now));
        assert!(!ViewWindow::Day.contains(&utc(2024, 3, 14, 18, 29), &now));
    }

    #[test]
    fn day_window_has_no_upper_bound() {
        let now = local(2024, 3, 15, 10, 0);
        assert!(ViewWindow::Day.contains(&utc(2024, 4, 1, 0, 0), &now));
    }

    #[test]
    fn week_window_reaches_back_seven_calendar_days() {
        let now = local(2024, 3, 15, 23, 59);
        assert_eq!(window_start(ViewWindow::Week, &now), utc(2024, 3, 7, 18, 30));
        assert!(ViewWindow::Week.contains(&utc(2024, 3, 7, 18, 30), &now));
        assert!(!ViewWindow::Week.contains(&utc(2024, 3, 7, 18, 29), &now));
    }

    #[test]
    fn week_window_crosses_month_and_year_edges() {
        let now = local(2024, 1, 3, 8, 0);
        assert_eq!(window_start(ViewWindow::Week, &now), utc(2023, 12, 26, 18, 30));
    }

    #[test]
    fn month_window_is_calendar_membership_in_local_zone() {
        let now = local(2024, 3, 15, 10, 0);
        // 2024-02-29 20:00 UTC is already 2024-03-01 01:30 IST.
        assert!(ViewWindow::Month.contains(&utc(2024, 2, 29, 20, 0), &now));
        assert!(!ViewWindow::Month.contains(&utc(2024, 2, 29, 18, 0), &now));
        assert!(ViewWindow::Month.contains(&utc(2024, 3, 31, 18, 29), &now));
        assert!(!ViewWindow::Month.contains(&utc(2024, 3, 31, 18, 30), &now));
    }

    #[test]
    fn month_window_requires_matching_year() {
        let now = local(2024, 3, 15, 10, 0);
        assert!(!ViewWindow::Month.contains(&utc(2023, 3, 15, 10, 0), &now));
    }

    #[test]
    fn month_start_is_first_of_month() {
        let now = local(2024, 2, 29, 12, 0);
        assert_eq!(window_start(ViewWindow::Month, &now), utc(2024, 1, 31, 18, 30));
    }

    #[test]
    fn start_of_day_in_utc_is_plain_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(start_of_day(&Utc, date), utc(2024, 7, 1, 0, 0));
    }

    /// UTC-3 with one summer period at UTC-2. Clocks jump from 00:00 to
    /// 01:00 on 2018-11-04, so that midnight never happens, and fall back
    /// from 01:00 to 00:00 on 2019-02-17, so that midnight happens twice.
    #[derive(Debug, Clone, Copy)]
    struct ShiftingZone;

    impl ShiftingZone {
        fn standard() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).unwrap()
        }

        fn at_utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<ShiftingZone> {
            ShiftingZone.from_utc_datetime(&utc(y, m, d, h, 0).naive_utc())
        }
    }

    impl TimeZone for ShiftingZone {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            ShiftingZone
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            // Summer first, so an ambiguous local time lists the earlier instant first.
            let valid: Vec<FixedOffset> = [Self::summer(), Self::standard()]
                .into_iter()
                .filter(|offset| {
                    let instant = *local - Duration::seconds(i64::from(offset.local_minus_utc()));
                    self.offset_from_utc_datetime(&instant) == *offset
                })
                .collect();
            match valid[..] {
                [only] => LocalResult::Single(only),
                [earlier, later] => LocalResult::Ambiguous(earlier, later),
                _ => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, instant: &NaiveDateTime) -> FixedOffset {
            let summer_start = utc(2018, 11, 4, 3, 0).naive_utc();
            let summer_end = utc(2019, 2, 17, 3, 0).naive_utc();
            if (summer_start..summer_end).contains(instant) {
                Self::summer()
            } else {
                Self::standard()
            }
        }
    }

    #[test]
    fn missing_midnight_starts_the_day_at_the_first_valid_quarter_hour() {
        let gap_day = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        assert!(ShiftingZone
            .from_local_datetime(&gap_day.and_time(NaiveTime::MIN))
            .earliest()
            .is_none());
        // 01:00 at UTC-2.
        assert_eq!(start_of_day(&ShiftingZone, gap_day), utc(2018, 11, 4, 3, 0));

        let now = ShiftingZone::at_utc(2018, 11, 4, 12);
        assert_eq!(window_start(ViewWindow::Day, &now), utc(2018, 11, 4, 3, 0));
        assert_eq!(window_start(ViewWindow::Week, &now), utc(2018, 10, 28, 3, 0));
        assert!(ViewWindow::Day.contains(&utc(2018, 11, 4, 3, 0), &now));
        assert!(!ViewWindow::Day.contains(&utc(2018, 11, 4, 2, 59), &now));

        let week_later = ShiftingZone::at_utc(2018, 11, 11, 12);
        assert_eq!(window_start(ViewWindow::Week, &week_later), utc(2018, 11, 4, 3, 0));
        assert!(ViewWindow::Week.contains(&utc(2018, 11, 4, 3, 0), &week_later));
        assert!(!ViewWindow::Week.contains(&utc(2018, 11, 4, 2, 59), &week_later));
    }

    #[test]
    fn repeated_midnight_starts_the_day_at_the_earlier_instant() {
        let overlap_day = NaiveDate::from_ymd_opt(2019, 2, 17).unwrap();
        // The first 00:00 is at UTC-2, the repeat an hour later at UTC-3.
        assert_eq!(start_of_day(&ShiftingZone, overlap_day), utc(2019, 2, 17, 2, 0));

        let now = ShiftingZone::at_utc(2019, 2, 17, 12);
        assert_eq!(window_start(ViewWindow::Day, &now), utc(2019, 2, 17, 2, 0));
        assert_eq!(window_start(ViewWindow::Week, &now), utc(2019, 2, 10, 2, 0));
        assert!(ViewWindow::Day.contains(&utc(2019, 2, 17, 2, 30), &now));
        assert!(!ViewWindow::Day.contains(&utc(2019, 2, 17, 1, 59), &now));

        let week_later = ShiftingZone::at_utc(2019, 2, 24, 12);
        assert_eq!(window_start(ViewWindow::Week, &week_later), utc(2019, 2, 17, 2, 0));
    }

    #[test]
    fn window_names_round_trip_through_from_str() {
        for window in ViewWindow::ALL {
            assert_eq!(window.as_str().parse::<ViewWindow>().unwrap(), window);
        }
        assert!("year".parse::<ViewWindow>().is_err());
    }
}
