//! Report filter translation
//!
//! Turns the mode picked on the daily report into concrete date bounds and
//! a shift rule, then applies them to transaction records.

use assetdesk_config::{Config, ReportMode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::models::AssetTransaction;
use crate::time::{format_dd_mm_yyyy, BusinessCalendar};
use crate::types::Shift;

/// Report settings derived from the config
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub calendar: BusinessCalendar,
    /// Rooms whose afternoon pickups ride along with the morning run
    pub branch_rooms: Vec<String>,
    pub page_size: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            calendar: BusinessCalendar::default(),
            branch_rooms: ["CMT8", "NS", "ĐS", "LĐH"]
                .iter()
                .map(|room| room.to_string())
                .collect(),
            page_size: 10,
        }
    }
}

impl ReportSettings {
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        Ok(Self {
            calendar: BusinessCalendar::from_config(&config.report)?,
            branch_rooms: config.report.branch_rooms.clone(),
            page_size: config.report.page_size,
        })
    }
}

/// User supplied bounds for [`ReportMode::Custom`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// `None` means both shifts
    pub shift: Option<Shift>,
}

impl CustomRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, shift: Option<Shift>) -> Self {
        Self { start, end, shift }
    }

    /// Range pre-filled in the custom form: today to the default end date
    pub fn default_for(calendar: &BusinessCalendar, now: DateTime<Utc>) -> Self {
        Self {
            start: Some(calendar.today(now)),
            end: Some(calendar.default_end_date(now)),
            shift: None,
        }
    }
}

/// Which shifts (and rooms) pass the filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ShiftRule {
    Any,
    Only { shift: Shift },
    /// Morning records plus afternoon records of the listed rooms, all on
    /// the start date
    MorningWithBranchAfternoon { rooms: Vec<String> },
}

/// Concrete query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub start_date: NaiveDate,
    /// `None` leaves the range open-ended
    pub end_date: Option<NaiveDate>,
    pub shift: ShiftRule,
}

impl ReportFilter {
    /// Single-day filter
    pub fn on(date: NaiveDate, shift: ShiftRule) -> Self {
        Self {
            start_date: date,
            end_date: Some(date),
            shift,
        }
    }

    /// Whether a record passes. Records with an unparseable date never do.
    pub fn matches(&self, tx: &AssetTransaction) -> bool {
        let Some(date) = tx.date_naive() else {
            return false;
        };

        if date < self.start_date {
            return false;
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }

        match &self.shift {
            ShiftRule::Any => true,
            ShiftRule::Only { shift } => shift.matches(&tx.parts_day),
            ShiftRule::MorningWithBranchAfternoon { rooms } => {
                date == self.start_date
                    && match tx.shift() {
                        Some(Shift::Morning) => true,
                        Some(Shift::Afternoon) => rooms.iter().any(|room| *room == tx.room),
                        None => false,
                    }
            }
        }
    }
}

/// Outcome of translating a mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterPlan {
    Execute { filter: ReportFilter },
    /// Nothing should be queried
    Disabled,
}

impl FilterPlan {
    pub fn is_disabled(&self) -> bool {
        matches!(self, FilterPlan::Disabled)
    }

    pub fn filter(&self) -> Option<&ReportFilter> {
        match self {
            FilterPlan::Execute { filter } => Some(filter),
            FilterPlan::Disabled => None,
        }
    }

    /// Records passing the filter, in input order
    pub fn apply<'a>(&self, transactions: &'a [AssetTransaction]) -> Vec<&'a AssetTransaction> {
        match self {
            FilterPlan::Execute { filter } => {
                transactions.iter().filter(|tx| filter.matches(tx)).collect()
            }
            FilterPlan::Disabled => Vec::new(),
        }
    }
}

/// Mode selection of the daily report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportContext {
    pub mode: ReportMode,
    /// Only read in [`ReportMode::Custom`]
    pub custom: CustomRange,
}

impl ReportContext {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            mode,
            custom: CustomRange::default(),
        }
    }

    pub fn custom(range: CustomRange) -> Self {
        Self {
            mode: ReportMode::Custom,
            custom: range,
        }
    }

    /// Translate the mode into query parameters at instant `now`.
    ///
    /// A custom range missing either bound is disabled rather than widened.
    pub fn plan(&self, settings: &ReportSettings, now: DateTime<Utc>) -> FilterPlan {
        let calendar = &settings.calendar;

        let filter = match self.mode {
            ReportMode::Today => ReportFilter::on(calendar.today(now), ShiftRule::Any),
            ReportMode::NextDay => ReportFilter::on(calendar.next_working_day(now), ShiftRule::Any),
            ReportMode::Morning => ReportFilter::on(
                calendar.morning_target_date(now),
                ShiftRule::Only { shift: Shift::Morning },
            ),
            ReportMode::Afternoon => ReportFilter::on(
                calendar.next_working_day(now),
                ShiftRule::Only { shift: Shift::Afternoon },
            ),
            ReportMode::QlnPgdNextDay => ReportFilter {
                start_date: calendar.morning_target_date(now),
                end_date: None,
                shift: ShiftRule::MorningWithBranchAfternoon {
                    rooms: settings.branch_rooms.clone(),
                },
            },
            ReportMode::Custom => match (self.custom.start, self.custom.end) {
                (Some(start), Some(end)) => ReportFilter {
                    start_date: start,
                    end_date: Some(end),
                    shift: match self.custom.shift {
                        Some(shift) => ShiftRule::Only { shift },
                        None => ShiftRule::Any,
                    },
                },
                _ => {
                    log::debug!("Custom report range incomplete, query disabled");
                    return FilterPlan::Disabled;
                }
            },
        };

        FilterPlan::Execute { filter }
    }

    /// Caption shown above the report
    pub fn description(&self, calendar: &BusinessCalendar, now: DateTime<Utc>) -> String {
        let morning = format_dd_mm_yyyy(calendar.morning_target_date(now));
        let next = format_dd_mm_yyyy(calendar.next_working_day(now));

        match self.mode {
            ReportMode::QlnPgdNextDay => format!("QLN Sáng & PGD trong ngày ({})", morning),
            ReportMode::Morning => format!("Sáng ngày ({})", morning),
            ReportMode::Afternoon => format!("Chiều ngày ({})", next),
            ReportMode::Today => format!(
                "Trong ngày hôm nay ({})",
                format_dd_mm_yyyy(calendar.today(now))
            ),
            ReportMode::NextDay => format!("Trong ngày kế tiếp ({})", next),
            ReportMode::Custom => match (self.custom.start, self.custom.end) {
                (Some(start), Some(end)) => format!(
                    "Từ {} đến {}",
                    format_dd_mm_yyyy(start),
                    format_dd_mm_yyyy(end)
                ),
                _ => "Tùy chọn khoảng thời gian".to_string(),
            },
        }
    }
}

// ==================== Tests ====================
