//! Basic types shared by the report modules

use serde::{Deserialize, Serialize};

/// Half of a business day (`parts_day` in the database)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// Morning
    #[serde(rename = "Sáng")]
    Morning,
    /// Afternoon
    #[serde(rename = "Chiều")]
    Afternoon,
}

impl Shift {
    /// Label as stored in the database
    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "Sáng",
            Shift::Afternoon => "Chiều",
        }
    }

    /// Whether a stored `parts_day` value denotes this shift
    pub fn matches(&self, parts_day: &str) -> bool {
        parts_day.parse::<Shift>().map(|s| s == *self).unwrap_or(false)
    }
}

impl std::str::FromStr for Shift {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sáng" | "sang" | "morning" => Ok(Shift::Morning),
            "chiều" | "chieu" | "afternoon" => Ok(Shift::Afternoon),
            _ => Err(format!("Invalid shift: {}", s)),
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Shift picked for a custom range: one shift, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftChoice {
    All,
    Only(Shift),
}

impl ShiftChoice {
    /// `None` means both shifts
    pub fn shift(self) -> Option<Shift> {
        match self {
            ShiftChoice::All => None,
            ShiftChoice::Only(shift) => Some(shift),
        }
    }
}

impl std::str::FromStr for ShiftChoice {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "tất cả" => Ok(ShiftChoice::All),
            _ => s.parse::<Shift>().map(ShiftChoice::Only),
        }
    }
}

/// Transaction type values the reports care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Asset lent out ("Mượn TS")
    Borrow,
    /// Asset issued out of storage ("Xuất kho")
    Issue,
}

impl TransactionKind {
    /// Label as stored in the database
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Borrow => "Mượn TS",
            TransactionKind::Issue => "Xuất kho",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Staff directory a person belongs to; each role has its own table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Branch manager officer
    Cbqln,
    /// Customer officer
    Cbkh,
    /// CRC approving manager
    Ldpcrc,
    /// CRC officer
    Cbcrc,
    /// CRC teller
    Quycrc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_from_str() {
        assert_eq!("Sáng".parse::<Shift>().unwrap(), Shift::Morning);
        assert_eq!("chieu".parse::<Shift>().unwrap(), Shift::Afternoon);
        assert_eq!("Afternoon".parse::<Shift>().unwrap(), Shift::Afternoon);
        assert!("all".parse::<Shift>().is_err());
    }

    #[test]
    fn test_shift_matches_stored_label() {
        assert!(Shift::Morning.matches("Sáng"));
        assert!(!Shift::Morning.matches("Chiều"));
        assert!(!Shift::Afternoon.matches(""));
    }

    #[test]
    fn test_shift_serde_uses_database_label() {
        assert_eq!(serde_json::to_string(&Shift::Afternoon).unwrap(), "\"Chiều\"");
        assert_eq!(serde_json::from_str::<Shift>("\"Sáng\"").unwrap(), Shift::Morning);
    }

    #[test]
    fn test_staff_role_serde_uses_table_name() {
        assert_eq!(serde_json::to_string(&StaffRole::Ldpcrc).unwrap(), "\"ldpcrc\"");
        assert_eq!(serde_json::from_str::<StaffRole>("\"cbkh\"").unwrap(), StaffRole::Cbkh);
    }

    #[test]
    fn test_shift_choice_accepts_all() {
        assert_eq!("all".parse::<ShiftChoice>().unwrap().shift(), None);
        assert_eq!("ALL".parse::<ShiftChoice>().unwrap(), ShiftChoice::All);
        assert_eq!("chiều".parse::<ShiftChoice>().unwrap().shift(), Some(Shift::Afternoon));
        assert!("evening".parse::<ShiftChoice>().is_err());
    }
}
