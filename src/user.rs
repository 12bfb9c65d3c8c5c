//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user logs in with.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// Leading and trailing whitespace is removed from `email` and it is
/// lowercased before being stored.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if `email` is blank,
/// - [Error::DuplicateEmail] if a user with the same email already exists,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(Error::Validation("Email cannot be empty.".to_owned()));
    }

    connection
        .prepare("INSERT INTO user (email, password) VALUES (?1, ?2) RETURNING id, email, password")?
        .query_row((email, password_hash.as_ref()), map_user_row)
        .map_err(Error::from)
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if there is no user with that email,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &normalize_email(email))], map_user_row)
        .map_err(Error::from)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let email = row.get(1)?;
    let password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(id),
        email,
        password_hash: PasswordHash::new_unchecked(&password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, PasswordHash, db::initialize};

    use super::{create_user, get_user_by_email};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_user_succeeds() {
        let conn = get_test_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let user = create_user("foo@bar.baz", password_hash.clone(), &conn).unwrap();

        assert_eq!(user.email, "foo@bar.baz");
        assert_eq!(user.password_hash, password_hash);
    }

    #[test]
    fn create_user_fails_on_duplicate_email() {
        let conn = get_test_connection();
        create_user("foo@bar.baz", PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        let result = create_user(" FOO@bar.baz ", PasswordHash::new_unchecked("hunter3"), &conn);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn create_user_fails_on_empty_email() {
        let conn = get_test_connection();

        let result = create_user("  ", PasswordHash::new_unchecked("hunter2"), &conn);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn get_user_by_email_ignores_case() {
        let conn = get_test_connection();
        let want = create_user("foo@bar.baz", PasswordHash::new_unchecked("hunter2"), &conn)
            .unwrap();

        let got = get_user_by_email("Foo@Bar.baz", &conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn get_user_by_email_fails_on_unknown_email() {
        let conn = get_test_connection();

        let result = get_user_by_email("nobody@bar.baz", &conn);

        assert_eq!(result, Err(Error::NotFound));
    }
}
