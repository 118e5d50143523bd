//! Business calendar
//!
//! All report dates are observed at a fixed UTC offset (UTC+7,
//! Asia/Bangkok, no daylight saving) so that the host time zone never
//! changes which day a report targets. Every resolver takes the current
//! instant as an argument; only the outermost caller reads a [`Clock`].

use assetdesk_config::ReportConfig;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

use crate::error::{CoreError, CoreResult};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed-offset calendar with the morning cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    offset: FixedOffset,
    cutoff: NaiveTime,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(7 * 3600).expect("Valid offset"),
            cutoff: NaiveTime::from_hms_opt(8, 6, 0).expect("Valid cutoff"),
        }
    }
}

impl BusinessCalendar {
    pub fn new(offset: FixedOffset, cutoff: NaiveTime) -> Self {
        Self { offset, cutoff }
    }

    /// Build from the `report` config section
    pub fn from_config(config: &ReportConfig) -> CoreResult<Self> {
        let offset = config
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| CoreError::ConfigError {
                message: format!("Invalid UTC offset: {}h", config.utc_offset_hours),
            })?;
        let cutoff = config.cutoff_time()?;
        Ok(Self::new(offset, cutoff))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn cutoff(&self) -> NaiveTime {
        self.cutoff
    }

    /// `now` as seen on a wall clock in the business time zone
    pub fn local_now(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    /// Business date of `now`
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_now(now).date_naive()
    }

    /// Next working day after today
    pub fn next_working_day(&self, now: DateTime<Utc>) -> NaiveDate {
        next_working_day(self.today(now))
    }

    /// Date the morning asset pull is working for.
    ///
    /// Before the cutoff it is today; from the cutoff on (inclusive) the
    /// morning run is closed and the next working day is targeted.
    pub fn morning_target_date(&self, now: DateTime<Utc>) -> NaiveDate {
        let local = self.local_now(now);
        if local.time() >= self.cutoff {
            next_working_day(local.date_naive())
        } else {
            local.date_naive()
        }
    }

    /// Default end of a report range: tomorrow, or Monday when tomorrow
    /// falls on a weekend. Time of day is ignored.
    pub fn default_end_date(&self, now: DateTime<Utc>) -> NaiveDate {
        next_working_day(self.today(now))
    }

    /// Whether a `dd-MM` due date has been reached on today's business date
    pub fn is_due(&self, day_month: &str, now: DateTime<Utc>) -> bool {
        is_day_month_due_or_overdue(day_month, self.today(now))
    }
}

/// Next Monday-to-Friday date strictly after `date`
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let next = date + Days::new(1);
    match next.weekday() {
        Weekday::Sat => next + Days::new(2),
        Weekday::Sun => next + Days::new(1),
        _ => next,
    }
}

/// Parse `dd-MM` into a date of `year`
pub fn parse_day_month(value: &str, year: i32) -> Option<NaiveDate> {
    static DAY_MONTH: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let pattern = DAY_MONTH.get_or_init(|| regex::Regex::new(r"^(\d{2})-(\d{2})$").unwrap());

    let captures = pattern.captures(value)?;
    let day: u32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether a recurring `dd-MM` date is today or already past.
///
/// The date is placed in `today`'s year, so an early-January due date is
/// reported overdue late in December of the same year. Malformed values
/// are never due.
pub fn is_day_month_due_or_overdue(value: &str, today: NaiveDate) -> bool {
    match parse_day_month(value, today.year()) {
        Some(due) => due <= today,
        None => {
            log::debug!("Ignoring malformed day-month value '{}'", value);
            false
        }
    }
}

/// `dd/MM/yyyy`, the format used in report captions
pub fn format_dd_mm_yyyy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Instant whose UTC+7 wall clock reads the given values
    fn bangkok(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_local_now_is_utc_plus_seven() {
        let calendar = BusinessCalendar::default();
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap();
        assert_eq!(calendar.local_now(now).hour(), 17);
    }

    #[test]
    fn test_today_rolls_over_before_utc_midnight() {
        let calendar = BusinessCalendar::default();
        // 23:30 UTC is already 06:30 of the next day in UTC+7
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 23, 30, 0).unwrap();
        assert_eq!(calendar.today(now), date(2024, 6, 12));
    }

    #[test]
    fn test_offset_is_stable_across_host_dst_seasons() {
        let calendar = BusinessCalendar::default();
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 10, 0, 0).unwrap();
        assert_eq!(calendar.local_now(winter).hour(), 17);
        assert_eq!(calendar.local_now(summer).hour(), 17);
    }

    #[test]
    fn test_next_working_day_weekdays() {
        // 2024-06-10 is a Monday
        assert_eq!(next_working_day(date(2024, 6, 10)), date(2024, 6, 11));
        assert_eq!(next_working_day(date(2024, 6, 13)), date(2024, 6, 14));
    }

    #[test]
    fn test_next_working_day_skips_weekend() {
        assert_eq!(next_working_day(date(2024, 6, 14)), date(2024, 6, 17)); // Fri
        assert_eq!(next_working_day(date(2024, 6, 15)), date(2024, 6, 17)); // Sat
        assert_eq!(next_working_day(date(2024, 6, 16)), date(2024, 6, 17)); // Sun
    }

    #[test]
    fn test_next_working_day_crosses_year() {
        // 2021-12-31 is a Friday
        assert_eq!(next_working_day(date(2021, 12, 31)), date(2022, 1, 3));
    }

    proptest! {
        #[test]
        fn prop_next_working_day_is_weekday_within_three_days(offset in 0u64..150_000) {
            let start = date(1900, 1, 1) + Days::new(offset);
            let next = next_working_day(start);
            let gap = (next - start).num_days();

            prop_assert!(next.weekday() != Weekday::Sat);
            prop_assert!(next.weekday() != Weekday::Sun);
            prop_assert!((1..=3).contains(&gap));
        }
    }

    #[test]
    fn test_morning_target_before_cutoff_is_today() {
        let calendar = BusinessCalendar::default();
        // Wednesday
        let now = bangkok(2024, 6, 12, 8, 5, 59);
        assert_eq!(calendar.morning_target_date(now), date(2024, 6, 12));
    }

    #[test]
    fn test_morning_target_at_cutoff_is_next_working_day() {
        let calendar = BusinessCalendar::default();
        let now = bangkok(2024, 6, 12, 8, 6, 0);
        assert_eq!(calendar.morning_target_date(now), date(2024, 6, 13));
    }

    #[test]
    fn test_morning_target_just_after_midnight_is_today() {
        let calendar = BusinessCalendar::default();
        let now = bangkok(2024, 6, 12, 0, 0, 0);
        assert_eq!(calendar.morning_target_date(now), date(2024, 6, 12));
    }

    #[test]
    fn test_morning_target_friday_afternoon_is_monday() {
        let calendar = BusinessCalendar::default();
        let now = bangkok(2024, 6, 14, 15, 0, 0);
        assert_eq!(calendar.morning_target_date(now), date(2024, 6, 17));
    }

    #[test]
    fn test_morning_target_saturday_morning_is_saturday() {
        let calendar = BusinessCalendar::default();
        let now = bangkok(2024, 6, 15, 7, 0, 0);
        assert_eq!(calendar.morning_target_date(now), date(2024, 6, 15));
    }

    #[test]
    fn test_custom_cutoff() {
        let calendar = BusinessCalendar::new(
            FixedOffset::east_opt(7 * 3600).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        let now = bangkok(2024, 6, 12, 11, 59, 0);
        assert_eq!(calendar.morning_target_date(now), date(2024, 6, 12));
    }

    #[test]
    fn test_default_end_date_ignores_time_of_day() {
        let calendar = BusinessCalendar::default();
        assert_eq!(calendar.default_end_date(bangkok(2024, 6, 12, 7, 0, 0)), date(2024, 6, 13));
        assert_eq!(calendar.default_end_date(bangkok(2024, 6, 12, 22, 0, 0)), date(2024, 6, 13));
        // Friday and Saturday both land on Monday
        assert_eq!(calendar.default_end_date(bangkok(2024, 6, 14, 7, 0, 0)), date(2024, 6, 17));
        assert_eq!(calendar.default_end_date(bangkok(2024, 6, 15, 7, 0, 0)), date(2024, 6, 17));
    }

    #[test]
    fn test_from_config() {
        let config = ReportConfig::default();
        let calendar = BusinessCalendar::from_config(&config).unwrap();
        assert_eq!(calendar, BusinessCalendar::default());
    }

    #[test]
    fn test_from_config_rejects_bad_cutoff() {
        let config = ReportConfig {
            cutoff: "25:99".to_string(),
            ..ReportConfig::default()
        };
        assert!(BusinessCalendar::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_rejects_unvalidated_offset() {
        for hours in [i32::MAX, i32::MIN, 25] {
            let config = ReportConfig {
                utc_offset_hours: hours,
                ..ReportConfig::default()
            };
            assert!(matches!(
                BusinessCalendar::from_config(&config),
                Err(CoreError::ConfigError { .. })
            ));
        }
    }

    #[test]
    fn test_day_month_due_and_overdue() {
        let today = date(2024, 6, 12);
        assert!(is_day_month_due_or_overdue("12-06", today));
        assert!(is_day_month_due_or_overdue("01-06", today));
        assert!(!is_day_month_due_or_overdue("13-06", today));
        assert!(!is_day_month_due_or_overdue("01-12", today));
    }

    #[test]
    fn test_day_month_is_stable_across_calls() {
        let today = date(2024, 6, 12);
        let first = is_day_month_due_or_overdue("05-01", today);
        let second = is_day_month_due_or_overdue("05-01", today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_day_month_malformed_is_not_due() {
        let today = date(2024, 6, 12);
        assert!(!is_day_month_due_or_overdue("13-45", today));
        assert!(!is_day_month_due_or_overdue("abc", today));
        assert!(!is_day_month_due_or_overdue("5-1", today));
        assert!(!is_day_month_due_or_overdue("05-01-2024", today));
        assert!(!is_day_month_due_or_overdue("", today));
    }

    #[test]
    fn test_day_month_feb_29_only_in_leap_years() {
        assert!(is_day_month_due_or_overdue("29-02", date(2024, 6, 1)));
        assert!(!is_day_month_due_or_overdue("29-02", date(2023, 6, 1)));
    }

    /// Pins the same-year placement of recurring dates: an early-January
    /// date is reported overdue in late December even though its next
    /// occurrence lies in the coming year. Whether dates should roll over
    /// is an open question with the desk owners; change this deliberately.
    #[test]
    fn test_day_month_year_rollover_reports_overdue() {
        assert!(is_day_month_due_or_overdue("05-01", date(2024, 12, 20)));
    }

    #[test]
    fn test_calendar_is_due_uses_business_date() {
        let calendar = BusinessCalendar::default();
        // 18:00 UTC on the 11th is already the 12th in UTC+7
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 18, 0, 0).unwrap();
        assert!(calendar.is_due("12-06", now));
    }

    #[test]
    fn test_format_dd_mm_yyyy() {
        assert_eq!(format_dd_mm_yyyy(date(2024, 1, 5)), "05/01/2024");
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 12, 1, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
