#![allow(missing_docs)]

use axum::{
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::IntoResponse,
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};
use axum_test::TestServer;
use rusqlite::Connection;
use sha2::{Digest, Sha512};

use crate::{
    AppState, PasswordHash, UserID,
    auth::{DEFAULT_COOKIE_DURATION, SESSION_COOKIE, STATUS_COOKIE, set_session_cookie},
    build_router,
    db::initialize,
};

pub(crate) const TEST_SECRET: &str = "nafstenoas";

pub(crate) fn test_cookie_key() -> Key {
    Key::from(&Sha512::digest(TEST_SECRET))
}

pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize(&connection).expect("could not initialize test DB");

    connection
}

/// Insert a user with a fixed ID so tests can refer to it directly.
#[track_caller]
pub(crate) fn insert_test_user(id: i64, connection: &Connection) -> UserID {
    connection
        .execute(
            "INSERT INTO user (id, email, password) VALUES (?1, ?2, ?3)",
            (
                id,
                format!("user{id}@example.com"),
                PasswordHash::new_unchecked("hunter2").as_ref(),
            ),
        )
        .expect("could not create test user");

    UserID::new(id)
}

pub(crate) fn must_create_test_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("could not create in-memory SQLite database"),
        TEST_SECRET,
    )
    .expect("could not create app state")
}

/// Leave the database lock poisoned, as if a handler panicked while holding it.
pub(crate) fn poison_db_connection(state: &AppState) {
    let connection = state.db_connection.clone();
    let result = std::thread::spawn(move || {
        let _guard = connection.lock().unwrap();
        panic!("panicked while holding the database lock");
    })
    .join();

    assert!(result.is_err());
    assert!(state.db_connection.is_poisoned());
}

pub(crate) fn must_create_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// The encrypted session cookie a browser would hold after `user_id` logged in.
pub(crate) fn session_cookie_for(user_id: UserID) -> Cookie<'static> {
    let jar = set_session_cookie(
        PrivateCookieJar::new(test_cookie_key()),
        user_id,
        DEFAULT_COOKIE_DURATION,
    );

    find_set_cookie(jar.into_response().headers(), SESSION_COOKIE)
        .expect("jar should set the session cookie")
}

fn find_set_cookie(headers: &HeaderMap, name: &str) -> Option<Cookie<'static>> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_owned()).ok())
        .find(|cookie| cookie.name() == name)
}

/// Decrypt the status message set by a response, if any.
pub(crate) fn get_status_message(headers: &HeaderMap, key: &Key) -> Option<String> {
    let cookie = find_set_cookie(headers, STATUS_COOKIE)?;

    let mut request_headers = HeaderMap::new();
    request_headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("{}={}", cookie.name(), cookie.value())).ok()?,
    );

    PrivateCookieJar::from_headers(&request_headers, key.clone())
        .get(STATUS_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}
