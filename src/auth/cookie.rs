//! Defines the private cookies that hold the session: the logged in user's ID
//! and the one-shot status message shown after a redirect.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID};

pub(crate) const SESSION_COOKIE: &str = "user_id";
pub(crate) const STATUS_COOKIE: &str = "status";
/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(1);

/// Add a session cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// The cookie expires `duration` from the current time.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(
        Cookie::build((SESSION_COOKIE, user_id.to_string()))
            .path("/")
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the user ID from the session cookie.
///
/// # Errors
///
/// Returns [Error::Unauthenticated] if the cookie is missing, could not be
/// decrypted, or does not hold a user ID.
pub(crate) fn get_user_id_from_cookies(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(Error::Unauthenticated)?;

    cookie
        .value_trimmed()
        .parse()
        .map(UserID::new)
        .map_err(|_| Error::Unauthenticated)
}

/// Store `message` so that the next page the client loads can show it.
pub(crate) fn set_status_cookie(jar: PrivateCookieJar, message: String) -> PrivateCookieJar {
    jar.add(
        Cookie::build((STATUS_COOKIE, message))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the pending status message and remove it from the jar.
pub(crate) fn take_status_cookie(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    match jar.get(STATUS_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_owned();
            let jar = jar.remove(Cookie::build(STATUS_COOKIE).path("/"));

            (jar, Some(message))
        }
        None => (jar, None),
    }
}
