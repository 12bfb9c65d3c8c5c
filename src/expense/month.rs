//! A calendar month used to filter expenses, written as `YYYY-MM`.

use std::{fmt::Display, str::FromStr};

use time::Month;

use crate::Error;

pub const INVALID_MONTH_MSG: &str = "Invalid month format (expected YYYY-MM)";

/// A year and month, e.g. `2024-02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: u16,
    month: Month,
}

impl YearMonth {
    /// Create a month filter.
    ///
    /// `year` must have four digits.
    pub fn new(year: u16, month: Month) -> Self {
        Self { year, month }
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse exactly four digits, a hyphen and two digits for a month from 01 to 12.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Validation(INVALID_MONTH_MSG.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let is_digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|byte| byte.is_ascii_digit())
        };
        if !is_digits(year, 4) || !is_digits(month, 2) {
            return Err(invalid());
        }

        let year = year.parse().map_err(|_| invalid())?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .ok_or_else(invalid)?;

        Ok(Self { year, month })
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}
