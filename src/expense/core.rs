//! Defines the expense model and the database queries behind the expense routes.
//!
//! Every query takes the logged in user's ID and only ever reads or writes
//! that user's rows.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, UserID,
    database_id::ExpenseId,
    expense::form::{ExpenseUpdate, ExportFilter, MonthFilter, NewExpense},
};

// ============================================================================
// MODELS
// ============================================================================

/// Money a user spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent. Always positive.
    pub amount: f64,
    /// A short label, e.g. "Food" or "Rent".
    pub category: String,
    /// Free text about the expense, may be empty.
    pub description: String,
    /// When the money was spent.
    pub date: Date,
    /// The user that owns the expense.
    pub user_id: UserID,
}

/// The sum of a user's expenses in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// One line of the CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: Date,
    pub category: String,
    pub amount: f64,
}

/// The state needed by the expense routes.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl ExpenseState {
    /// Lock the database connection.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

pub type RowsAffected = usize;

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expenses table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query filters on the owner, most also on the date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Insert `expense` as owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// e.g. if `user_id` does not refer to a registered user.
pub fn create_expense(
    expense: NewExpense,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expenses (amount, category, description, date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, category, description, date, user_id",
        )?
        .query_row(
            (
                expense.amount,
                expense.category,
                expense.description,
                expense.date,
                user_id.as_i64(),
            ),
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Retrieve one of `user_id`'s expenses by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_expense(
    id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, amount, category, description, date, user_id FROM expenses
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            rusqlite::named_params! { ":id": id, ":user_id": user_id.as_i64() },
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Sum `user_id`'s expenses per category over all time, ordered by category.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_category_totals(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) AS total FROM expenses
             WHERE user_id = :user_id
             GROUP BY category
             ORDER BY category",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Sum `user_id`'s expenses in the filter's month, and category if set.
///
/// Returns zero when no expense matches.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_month_total(
    user_id: UserID,
    filter: &MonthFilter,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses
             WHERE user_id = :user_id
             AND strftime('%Y-%m', date) = :month
             AND (:category IS NULL OR category = :category)",
        )?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":month": filter.month.to_string(),
                ":category": filter.category,
            },
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Set the date, category and amount of the expense `update.id` if `user_id` owns it.
///
/// Returns the number of rows changed, which is zero when the expense does
/// not exist or belongs to someone else.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn update_expense(
    update: &ExpenseUpdate,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE expenses
             SET date = :date, category = :category, amount = :amount
             WHERE id = :id AND user_id = :user_id",
            rusqlite::named_params! {
                ":date": update.date,
                ":category": update.category,
                ":amount": update.amount,
                ":id": update.id,
                ":user_id": user_id.as_i64(),
            },
        )
        .map_err(Error::from)
}

/// Delete the expense `id` if `user_id` owns it.
///
/// Returns the number of rows deleted, which is zero when the expense does
/// not exist or belongs to someone else.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_expense(
    id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM expenses WHERE id = :id AND user_id = :user_id",
            rusqlite::named_params! { ":id": id, ":user_id": user_id.as_i64() },
        )
        .map_err(Error::from)
}

/// Get the date, category and amount of `user_id`'s expenses that match
/// `filter`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_export_rows(
    user_id: UserID,
    filter: &ExportFilter,
    connection: &Connection,
) -> Result<Vec<ExportRow>, Error> {
    let (from, to) = filter.date_range.unzip();

    connection
        .prepare(
            "SELECT date, category, amount FROM expenses
             WHERE user_id = :user_id
             AND (:from IS NULL OR date BETWEEN :from AND :to)
             AND (:category IS NULL OR category = :category)
             ORDER BY date, id",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":from": from,
                ":to": to,
                ":category": filter.category,
            },
            |row| {
                Ok(ExportRow {
                    date: row.get(0)?,
                    category: row.get(1)?,
                    amount: row.get(2)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category = row.get(2)?;
    let description = row.get(3)?;
    let date = row.get(4)?;
    let user_id = row.get(5)?;

    Ok(Expense {
        id,
        amount,
        category,
        description,
        date,
        user_id: UserID::new(user_id),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        Error, UserID,
        expense::{
            form::{ExpenseUpdate, ExportFilter, MonthFilter, NewExpense},
            month::YearMonth,
        },
        test_utils::{insert_test_user, must_create_test_connection},
    };

    use super::{
        CategoryTotal, ExportRow, create_expense, delete_expense, get_category_totals,
        get_expense, get_export_rows, get_month_total, update_expense,
    };

    fn new_expense(amount: f64, category: &str, date: time::Date) -> NewExpense {
        NewExpense {
            amount,
            category: category.to_owned(),
            description: String::new(),
            date,
        }
    }

    fn setup() -> (Connection, UserID, UserID) {
        let conn = must_create_test_connection();
        let owner = insert_test_user(7, &conn);
        let other = insert_test_user(8, &conn);

        (conn, owner, other)
    }

    #[test]
    fn create_succeeds() {
        let (conn, owner, _) = setup();

        let expense =
            create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn)
                .unwrap();

        assert_eq!(expense.user_id, owner);
        assert_eq!(expense.amount, 50.0);
        assert_eq!(get_expense(expense.id, owner, &conn), Ok(expense));
    }

    #[test]
    fn create_fails_for_unknown_user() {
        let (conn, _, _) = setup();

        let result = create_expense(
            new_expense(50.0, "Food", date!(2024 - 02 - 10)),
            UserID::new(999),
            &conn,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_fails_for_other_users_expense() {
        let (conn, owner, other) = setup();
        let expense =
            create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn)
                .unwrap();

        assert_eq!(get_expense(expense.id, other, &conn), Err(Error::NotFound));
    }

    #[test]
    fn category_totals_only_include_owners_expenses() {
        let (conn, owner, other) = setup();
        create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn).unwrap();
        create_expense(new_expense(12.5, "Food", date!(2023 - 06 - 01)), owner, &conn).unwrap();
        create_expense(new_expense(900.0, "Rent", date!(2024 - 02 - 01)), owner, &conn).unwrap();
        create_expense(new_expense(1000.0, "Food", date!(2024 - 02 - 10)), other, &conn).unwrap();

        let totals = get_category_totals(owner, &conn).unwrap();

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    total: 62.5
                },
                CategoryTotal {
                    category: "Rent".to_owned(),
                    total: 900.0
                },
            ]
        );
    }

    #[test]
    fn category_totals_empty_without_expenses() {
        let (conn, owner, _) = setup();

        assert_eq!(get_category_totals(owner, &conn).unwrap(), vec![]);
    }

    #[test]
    fn month_total_filters_by_month_and_category() {
        let (conn, owner, other) = setup();
        create_expense(new_expense(10.0, "Food", date!(2024 - 02 - 01)), owner, &conn).unwrap();
        create_expense(new_expense(20.0, "Food", date!(2024 - 02 - 29)), owner, &conn).unwrap();
        create_expense(new_expense(40.0, "Fuel", date!(2024 - 02 - 15)), owner, &conn).unwrap();
        create_expense(new_expense(80.0, "Food", date!(2024 - 03 - 01)), owner, &conn).unwrap();
        create_expense(new_expense(160.0, "Food", date!(2024 - 02 - 10)), other, &conn).unwrap();
        let february = YearMonth::new(2024, Month::February);

        let all = get_month_total(
            owner,
            &MonthFilter {
                month: february,
                category: None,
            },
            &conn,
        )
        .unwrap();
        let food = get_month_total(
            owner,
            &MonthFilter {
                month: february,
                category: Some("Food".to_owned()),
            },
            &conn,
        )
        .unwrap();

        assert_eq!(all, 70.0);
        assert_eq!(food, 30.0);
    }

    #[test]
    fn month_total_is_zero_without_matches() {
        let (conn, owner, _) = setup();
        create_expense(new_expense(10.0, "Food", date!(2024 - 02 - 01)), owner, &conn).unwrap();

        let total = get_month_total(
            owner,
            &MonthFilter {
                month: YearMonth::new(2023, Month::January),
                category: None,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(total, 0.0);
    }

    #[test]
    fn update_changes_owned_expense() {
        let (conn, owner, _) = setup();
        let expense =
            create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn)
                .unwrap();
        let update = ExpenseUpdate {
            id: expense.id,
            date: date!(2024 - 02 - 11),
            category: "Groceries".to_owned(),
            amount: 55.0,
        };

        let rows_affected = update_expense(&update, owner, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        let got = get_expense(expense.id, owner, &conn).unwrap();
        assert_eq!(got.date, date!(2024 - 02 - 11));
        assert_eq!(got.category, "Groceries");
        assert_eq!(got.amount, 55.0);
        assert_eq!(got.user_id, owner);
    }

    #[test]
    fn update_ignores_other_users_expense() {
        let (conn, owner, other) = setup();
        let expense =
            create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn)
                .unwrap();
        let update = ExpenseUpdate {
            id: expense.id,
            date: date!(2024 - 02 - 11),
            category: "Stolen".to_owned(),
            amount: 1.0,
        };

        let rows_affected = update_expense(&update, other, &conn).unwrap();

        assert_eq!(rows_affected, 0);
        assert_eq!(get_expense(expense.id, owner, &conn), Ok(expense));
    }

    #[test]
    fn delete_removes_owned_expense() {
        let (conn, owner, _) = setup();
        let expense =
            create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn)
                .unwrap();

        let rows_affected = delete_expense(expense.id, owner, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_expense(expense.id, owner, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_ignores_other_users_and_missing_expenses() {
        let (conn, owner, other) = setup();
        let expense =
            create_expense(new_expense(50.0, "Food", date!(2024 - 02 - 10)), owner, &conn)
                .unwrap();

        assert_eq!(delete_expense(expense.id, other, &conn), Ok(0));
        assert_eq!(delete_expense(expense.id + 100, owner, &conn), Ok(0));
        assert_eq!(get_expense(expense.id, owner, &conn), Ok(expense));
    }

    #[test]
    fn export_rows_respect_inclusive_range_and_category() {
        let (conn, owner, other) = setup();
        create_expense(new_expense(1.0, "Food", date!(2023 - 12 - 31)), owner, &conn).unwrap();
        create_expense(new_expense(2.0, "Food", date!(2024 - 01 - 01)), owner, &conn).unwrap();
        create_expense(new_expense(3.0, "Fuel", date!(2024 - 01 - 15)), owner, &conn).unwrap();
        create_expense(new_expense(4.0, "Food", date!(2024 - 01 - 31)), owner, &conn).unwrap();
        create_expense(new_expense(5.0, "Food", date!(2024 - 02 - 01)), owner, &conn).unwrap();
        create_expense(new_expense(6.0, "Food", date!(2024 - 01 - 10)), other, &conn).unwrap();
        let january = Some((date!(2024 - 01 - 01), date!(2024 - 01 - 31)));

        let in_range = get_export_rows(
            owner,
            &ExportFilter {
                date_range: january,
                category: None,
            },
            &conn,
        )
        .unwrap();
        let food_in_range = get_export_rows(
            owner,
            &ExportFilter {
                date_range: january,
                category: Some("Food".to_owned()),
            },
            &conn,
        )
        .unwrap();
        let everything = get_export_rows(owner, &ExportFilter::default(), &conn).unwrap();

        let amounts = |rows: &[ExportRow]| rows.iter().map(|row| row.amount).collect::<Vec<_>>();
        assert_eq!(amounts(&in_range), vec![2.0, 3.0, 4.0]);
        assert_eq!(amounts(&food_in_range), vec![2.0, 4.0]);
        assert_eq!(amounts(&everything), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
