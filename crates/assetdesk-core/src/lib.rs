//! Core asset desk logic: business calendar, report filters, reports,
//! reminders and the cached transaction source

pub mod cache;
pub mod error;
pub mod filter;
pub mod models;
pub mod reminders;
pub mod reports;
pub mod source;
pub mod time;
pub mod types;

pub use cache::{CacheEntry, TtlCache};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorLogger, ErrorSeverity};
pub use filter::{CustomRange, FilterPlan, ReportContext, ReportFilter, ReportSettings, ShiftRule};
pub use models::{AssetReminder, AssetTransaction, CrcReminder, DayMonthDue, StaffMember};
pub use reminders::{due_reminders, CrcNotice};
pub use reports::{asset_history, BorrowQuery, BorrowReport, DailyReport, GroupedRow, Page};
pub use source::{CachedTransactionSource, JsonFileSource, SourceRef, TransactionSource};
pub use time::{BusinessCalendar, Clock, FixedClock, SystemClock};
pub use types::{Shift, ShiftChoice, StaffRole, TransactionKind};
