//! Utility functions and helpers
//!
//! Asset codes are written `<code>.<yy>`, e.g. `259.24` is asset 259 of
//! the 2024 batch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset code validation errors, worded for the people typing the codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetCodeError {
    #[error("Vui lòng điền đầy đủ tất cả các mã tài sản")]
    Empty,

    #[error("Mã tài sản \"{0}\" không đúng định dạng. Vui lòng nhập theo format: Mã.Năm (ví dụ: 259.24)")]
    InvalidFormat(String),

    #[error("Năm tài sản \"{0}\" phải từ 20-99")]
    YearOutOfRange(String),
}

/// A parsed asset code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetCode {
    /// Sequence number within the batch
    pub code: u32,
    /// Two-digit batch year (20-99)
    pub year: u32,
}

impl AssetCode {
    /// Parse `<code>.<yy>`. Surrounding whitespace is a format error.
    pub fn parse(value: &str) -> Result<Self, AssetCodeError> {
        if value.trim().is_empty() {
            return Err(AssetCodeError::Empty);
        }

        static FORMAT: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
        let format = FORMAT.get_or_init(|| regex::Regex::new(r"^(\d{1,4})\.(\d{2})$").unwrap());

        let captures = format
            .captures(value)
            .ok_or_else(|| AssetCodeError::InvalidFormat(value.to_string()))?;

        let code: u32 = captures[1]
            .parse()
            .map_err(|_| AssetCodeError::InvalidFormat(value.to_string()))?;
        let year: u32 = captures[2]
            .parse()
            .map_err(|_| AssetCodeError::InvalidFormat(value.to_string()))?;

        if !(20..=99).contains(&year) {
            return Err(AssetCodeError::YearOutOfRange(value.to_string()));
        }

        Ok(Self { code, year })
    }

    /// Four-digit year of the batch
    pub fn full_year(&self) -> i32 {
        2000 + self.year as i32
    }
}

impl std::fmt::Display for AssetCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.code, self.year)
    }
}

impl std::str::FromStr for AssetCode {
    type Err = AssetCodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetCode::parse(s)
    }
}
