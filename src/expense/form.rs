//! Raw form and query data for the expense routes, and the validated
//! commands they are parsed into before any query runs.
//!
//! The raw types hold every field as an optional string so that a missing or
//! malformed field becomes a status message instead of an extractor rejection.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::ExpenseId,
    expense::month::{INVALID_MONTH_MSG, YearMonth},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

pub const ADD_MISSING_FIELDS_MSG: &str = "All fields except description are required.";
pub const EDIT_MISSING_FIELDS_MSG: &str = "Missing required fields for editing.";
pub const LOG_IN_REQUIRED_MSG: &str = "You must be logged in.";

/// The form data for adding an expense.
///
/// Any other field in the form, such as a `user_id`, is ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AddExpenseForm {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// A validated expense ready to be inserted for the logged in user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: Date,
}

impl TryFrom<AddExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: AddExpenseForm) -> Result<Self, Self::Error> {
        let (Some(amount), Some(category), Some(date)) = (
            non_blank(form.amount),
            non_blank(form.category),
            non_blank(form.date),
        ) else {
            return Err(Error::Validation(ADD_MISSING_FIELDS_MSG.to_owned()));
        };

        Ok(Self {
            amount: parse_amount(&amount)?,
            category,
            description: form.description.unwrap_or_default(),
            date: parse_date(&date)?,
        })
    }
}

/// The form data for editing an expense.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EditExpenseForm {
    pub id: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
}

/// The new date, category and amount for one of the logged in user's expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    pub id: ExpenseId,
    pub date: Date,
    pub category: String,
    pub amount: f64,
}

impl TryFrom<EditExpenseForm> for ExpenseUpdate {
    type Error = Error;

    fn try_from(form: EditExpenseForm) -> Result<Self, Self::Error> {
        let (Some(id), Some(date), Some(category), Some(amount)) = (
            non_blank(form.id),
            non_blank(form.date),
            non_blank(form.category),
            non_blank(form.amount),
        ) else {
            return Err(Error::Validation(EDIT_MISSING_FIELDS_MSG.to_owned()));
        };

        Ok(Self {
            id: parse_expense_id(&id)?,
            date: parse_date(&date)?,
            category,
            amount: parse_amount(&amount)?,
        })
    }
}

/// The query parameters for the monthly total.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FilteredSummaryQuery {
    pub month: Option<String>,
    pub category: Option<String>,
}

/// Restricts the monthly total to one month and, optionally, one category.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthFilter {
    pub month: YearMonth,
    pub category: Option<String>,
}

impl TryFrom<FilteredSummaryQuery> for MonthFilter {
    type Error = Error;

    fn try_from(query: FilteredSummaryQuery) -> Result<Self, Self::Error> {
        let month = query
            .month
            .ok_or_else(|| Error::Validation(INVALID_MONTH_MSG.to_owned()))?
            .parse()?;

        Ok(Self {
            month,
            category: non_blank(query.category),
        })
    }
}

/// The query parameters for the CSV export.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub category: Option<String>,
}

/// Which of the logged in user's expenses to export.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportFilter {
    /// Inclusive start and end dates. Only applied when both ends were given.
    pub date_range: Option<(Date, Date)>,
    pub category: Option<String>,
}

impl TryFrom<ExportQuery> for ExportFilter {
    type Error = Error;

    fn try_from(query: ExportQuery) -> Result<Self, Self::Error> {
        let date_range = match (non_blank(query.from), non_blank(query.to)) {
            (Some(from), Some(to)) => Some((parse_date(&from)?, parse_date(&to)?)),
            _ => None,
        };

        Ok(Self {
            date_range,
            category: non_blank(query.category),
        })
    }
}

/// Trim `field`, treating a blank string the same as a missing field.
fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_expense_id(raw_id: &str) -> Result<ExpenseId, Error> {
    raw_id
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("\"{raw_id}\" is not a valid expense ID.")))
}

fn parse_amount(raw_amount: &str) -> Result<f64, Error> {
    match raw_amount.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::Validation(format!(
            "Amount must be a positive number, got \"{raw_amount}\"."
        ))),
    }
}

fn parse_date(raw_date: &str) -> Result<Date, Error> {
    Date::parse(raw_date, DATE_FORMAT).map_err(|_| {
        Error::Validation(format!(
            "Date must be in the format YYYY-MM-DD, got \"{raw_date}\"."
        ))
    })
}

#[cfg(test)]
mod add_expense_tests {
    use time::macros::date;

    use crate::Error;

    use super::{ADD_MISSING_FIELDS_MSG, AddExpenseForm, NewExpense};

    fn form(amount: &str, category: &str, date: &str) -> AddExpenseForm {
        AddExpenseForm {
            amount: Some(amount.to_owned()),
            category: Some(category.to_owned()),
            description: None,
            date: Some(date.to_owned()),
        }
    }

    #[test]
    fn valid_form_parses() {
        let got = NewExpense::try_from(form("50", " Food ", "2024-02-10")).unwrap();

        assert_eq!(
            got,
            NewExpense {
                amount: 50.0,
                category: "Food".to_owned(),
                description: String::new(),
                date: date!(2024 - 02 - 10),
            }
        );
    }

    #[test]
    fn missing_fields_are_rejected() {
        let cases = [
            AddExpenseForm::default(),
            AddExpenseForm {
                amount: None,
                ..form("50", "Food", "2024-02-10")
            },
            form("50", "   ", "2024-02-10"),
            form("50", "Food", ""),
        ];

        for case in cases {
            assert_eq!(
                NewExpense::try_from(case.clone()),
                Err(Error::Validation(ADD_MISSING_FIELDS_MSG.to_owned())),
                "want {case:?} to be rejected for missing fields"
            );
        }
    }

    #[test]
    fn non_numeric_amounts_are_rejected() {
        for amount in ["abc", "NaN", "inf", "-5", "0", "12,50"] {
            let result = NewExpense::try_from(form(amount, "Food", "2024-02-10"));

            assert!(
                matches!(result, Err(Error::Validation(_))),
                "want amount {amount:?} to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn malformed_date_is_rejected() {
        for date in ["10/02/2024", "2024-02-30", "2024-02"] {
            let result = NewExpense::try_from(form("50", "Food", date));

            assert!(
                matches!(result, Err(Error::Validation(_))),
                "want date {date:?} to be rejected, got {result:?}"
            );
        }
    }
}
