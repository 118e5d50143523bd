//! Records exported from the asset database

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{Shift, StaffRole, TransactionKind};

/// One asset movement (`asset_transactions` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTransaction {
    /// Row identifier
    #[serde(default)]
    pub id: String,
    /// Staff member who recorded the movement
    #[serde(default)]
    pub staff_code: String,
    /// Business date (YYYY-MM-DD)
    pub transaction_date: String,
    /// Shift label ("Sáng" or "Chiều")
    pub parts_day: String,
    /// Room / branch code
    pub room: String,
    /// Movement type ("Mượn TS", "Xuất kho", ...)
    pub transaction_type: String,
    /// Asset batch year
    pub asset_year: u32,
    /// Asset number within the batch
    pub asset_code: u32,
    /// Free text note
    #[serde(default)]
    pub note: Option<String>,
    /// Insertion timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AssetTransaction {
    /// Parsed business date
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.transaction_date, "%Y-%m-%d").ok()
    }

    /// Parsed shift
    pub fn shift(&self) -> Option<Shift> {
        self.parts_day.parse().ok()
    }

    /// Check the movement type
    pub fn is_kind(&self, kind: TransactionKind) -> bool {
        self.transaction_type == kind.label()
    }

    /// Key identifying the physical asset across movements
    pub fn asset_key(&self) -> String {
        format!("{}-{}-{}", self.room, self.asset_year, self.asset_code)
    }
}

/// Recurring asset reminder (`asset_reminders` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReminder {
    pub id: String,
    /// Asset name
    pub ten_ts: String,
    /// Due date, `dd-MM`
    pub ngay_den_han: String,
    /// Customer officer
    #[serde(default)]
    pub cbkh: Option<String>,
    /// Branch manager officer
    #[serde(default)]
    pub cbqln: Option<String>,
    #[serde(default)]
    pub is_sent: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Recurring CRC approval reminder (`crc_reminders` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrcReminder {
    pub id: String,
    /// CRC kind
    pub loai_bt_crc: String,
    /// Execution date, `dd-MM`
    pub ngay_thuc_hien: String,
    /// Approving manager
    #[serde(default)]
    pub ldpcrc: Option<String>,
    /// CRC officer
    #[serde(default)]
    pub cbcrc: Option<String>,
    /// CRC teller
    #[serde(default)]
    pub quycrc: Option<String>,
    #[serde(default)]
    pub is_sent: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Staff directory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    /// Display name, as referenced by reminders
    pub ten_nv: String,
    pub role: StaffRole,
    /// Mailbox prefix
    #[serde(default)]
    pub email: Option<String>,
}

/// Anything carrying a recurring `dd-MM` due date
pub trait DayMonthDue {
    fn day_month(&self) -> &str;
}

impl DayMonthDue for AssetReminder {
    fn day_month(&self) -> &str {
        &self.ngay_den_han
    }
}

impl DayMonthDue for CrcReminder {
    fn day_month(&self) -> &str {
        &self.ngay_thuc_hien
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AssetTransaction {
        AssetTransaction {
            id: "t1".to_string(),
            staff_code: "nv01".to_string(),
            transaction_date: "2024-06-14".to_string(),
            parts_day: "Chiều".to_string(),
            room: "CMT8".to_string(),
            transaction_type: "Mượn TS".to_string(),
            asset_year: 24,
            asset_code: 259,
            note: None,
            created_at: None,
        }
    }

    #[test]
    fn test_transaction_accessors() {
        let tx = sample();
        assert_eq!(tx.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 14));
        assert_eq!(tx.shift(), Some(Shift::Afternoon));
        assert!(tx.is_kind(TransactionKind::Borrow));
        assert!(!tx.is_kind(TransactionKind::Issue));
        assert_eq!(tx.asset_key(), "CMT8-24-259");
    }

    #[test]
    fn test_transaction_bad_date() {
        let mut tx = sample();
        tx.transaction_date = "14/06/2024".to_string();
        assert!(tx.date_naive().is_none());
    }

    #[test]
    fn test_transaction_deserialize_minimal_row() {
        let json = r#"{
            "transaction_date": "2024-06-14",
            "parts_day": "Sáng",
            "room": "NS",
            "transaction_type": "Xuất kho",
            "asset_year": 23,
            "asset_code": 12
        }"#;
        let tx: AssetTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.room, "NS");
        assert!(tx.note.is_none());
        assert!(tx.id.is_empty());
    }

    #[test]
    fn test_day_month_accessors() {
        let reminder = CrcReminder {
            id: "c1".to_string(),
            loai_bt_crc: "Quý".to_string(),
            ngay_thuc_hien: "15-03".to_string(),
            ldpcrc: None,
            cbcrc: None,
            quycrc: None,
            is_sent: false,
            created_at: None,
        };
        assert_eq!(reminder.day_month(), "15-03");
    }

    #[test]
    fn test_staff_member_deserialize() {
        let json = r#"{"id": "s1", "ten_nv": "An", "role": "cbcrc", "email": "an.nv"}"#;
        let member: StaffMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.role, StaffRole::Cbcrc);
        assert_eq!(member.email.as_deref(), Some("an.nv"));
    }
}
