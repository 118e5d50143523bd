//! Report assembly
//!
//! Builds the daily movement report and the outstanding-loan (borrow)
//! report from a transaction list, plus the paging both views share.

use assetdesk_utils::AssetCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::filter::{FilterPlan, ReportContext, ReportSettings};
use crate::models::AssetTransaction;
use crate::time::BusinessCalendar;
use crate::types::TransactionKind;

/// One page of a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Slice out page `page` (1-based; 0 is treated as 1)
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let start = (page - 1).saturating_mul(per_page);

    Page {
        items: items.iter().skip(start).take(per_page).cloned().collect(),
        page,
        per_page,
        total_count: items.len(),
        total_pages: items.len().div_ceil(per_page),
    }
}

/// Room/year line of the grouped daily view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub room: String,
    pub year: u32,
    /// Distinct codes ascending, `*` marking codes moved more than once
    pub codes: String,
}

/// Group records by room then year, listing their asset codes
pub fn group_rows<'a, I>(transactions: I) -> Vec<GroupedRow>
where
    I: IntoIterator<Item = &'a AssetTransaction>,
{
    let mut groups: BTreeMap<&str, BTreeMap<u32, BTreeMap<u32, usize>>> = BTreeMap::new();
    for tx in transactions {
        *groups
            .entry(tx.room.as_str())
            .or_default()
            .entry(tx.asset_year)
            .or_default()
            .entry(tx.asset_code)
            .or_default() += 1;
    }

    groups
        .into_iter()
        .flat_map(|(room, years)| {
            years.into_iter().map(move |(year, codes)| GroupedRow {
                room: room.to_string(),
                year,
                codes: codes
                    .into_iter()
                    .map(|(code, count)| {
                        if count > 1 {
                            format!("{}*", code)
                        } else {
                            code.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        })
        .collect()
}

/// Daily movement report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub mode: String,
    pub caption: String,
    pub plan: FilterPlan,
    /// Matching records, newest `created_at` first
    pub transactions: Vec<AssetTransaction>,
    pub grouped: Vec<GroupedRow>,
}

impl DailyReport {
    pub fn build(
        context: &ReportContext,
        settings: &ReportSettings,
        transactions: &[AssetTransaction],
        now: DateTime<Utc>,
    ) -> Self {
        let plan = context.plan(settings, now);
        let mut matching: Vec<AssetTransaction> =
            plan.apply(transactions).into_iter().cloned().collect();
        // Rows without a creation stamp go last
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let grouped = group_rows(&matching);

        log::info!(
            "Daily report '{}': {} of {} records",
            context.mode,
            matching.len(),
            transactions.len()
        );

        Self {
            mode: context.mode.to_string(),
            caption: context.description(&settings.calendar, now),
            plan,
            transactions: matching,
            grouped,
        }
    }

    pub fn page(&self, page: usize, per_page: usize) -> Page<AssetTransaction> {
        paginate(&self.transactions, page, per_page)
    }
}

/// Selection for the borrow report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorrowQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// `None` for every room
    pub room: Option<String>,
}

impl BorrowQuery {
    /// Today through the next working day, every room
    pub fn default_for(calendar: &BusinessCalendar, now: DateTime<Utc>) -> Self {
        Self {
            start: Some(calendar.today(now)),
            end: Some(calendar.next_working_day(now)),
            room: None,
        }
    }
}

/// Assets lent out and not yet issued out of storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowReport {
    pub query: BorrowQuery,
    pub outstanding: Vec<AssetTransaction>,
    /// Every room present in the dataset
    pub rooms: Vec<String>,
}

impl BorrowReport {
    pub fn build(transactions: &[AssetTransaction], query: BorrowQuery) -> Self {
        let issued: HashSet<String> = transactions
            .iter()
            .filter(|tx| tx.is_kind(TransactionKind::Issue))
            .map(|tx| tx.asset_key())
            .collect();

        let mut outstanding: Vec<AssetTransaction> = transactions
            .iter()
            .filter(|tx| tx.is_kind(TransactionKind::Borrow))
            .filter(|tx| !issued.contains(&tx.asset_key()))
            .filter(|tx| match (query.start, query.end) {
                (Some(start), Some(end)) => tx
                    .date_naive()
                    .map(|date| date >= start && date <= end)
                    .unwrap_or(false),
                _ => true,
            })
            .filter(|tx| query.room.as_deref().map_or(true, |room| tx.room == room))
            .cloned()
            .collect();

        outstanding.sort_by(|a, b| {
            a.room
                .cmp(&b.room)
                .then(a.asset_year.cmp(&b.asset_year))
                .then(a.asset_code.cmp(&b.asset_code))
        });

        let rooms: BTreeSet<&str> = transactions.iter().map(|tx| tx.room.as_str()).collect();

        Self {
            query,
            outstanding,
            rooms: rooms.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn page(&self, page: usize, per_page: usize) -> Page<AssetTransaction> {
        paginate(&self.outstanding, page, per_page)
    }
}

/// Every movement of one asset, optionally within one room
pub fn asset_history<'a>(
    transactions: &'a [AssetTransaction],
    code: AssetCode,
    room: Option<&str>,
) -> Vec<&'a AssetTransaction> {
    transactions
        .iter()
        .filter(|tx| tx.asset_code == code.code && tx.asset_year % 100 == code.year)
        .filter(|tx| room.map_or(true, |room| tx.room == room))
        .collect()
}

// ==================== Tests ====================
