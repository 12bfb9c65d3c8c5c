//! The request-scoped session context handed to every route handler.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    Error, UserID,
    auth::cookie::{get_user_id_from_cookies, set_status_cookie, take_status_cookie},
};

/// The session state of a single request: who is calling, and the status
/// message slot that is carried over to the next page after a redirect.
///
/// Extracting a context never fails. Handlers decide what to do with a
/// missing session by calling [RequestContext::require_user].
#[derive(Debug)]
pub struct RequestContext {
    user_id: Option<UserID>,
    jar: PrivateCookieJar,
}

impl RequestContext {
    /// Create a context from an already decrypted cookie jar.
    pub fn new(jar: PrivateCookieJar) -> Self {
        let user_id = get_user_id_from_cookies(&jar).ok();

        Self { user_id, jar }
    }

    /// The ID of the logged in user, if any.
    pub fn user_id(&self) -> Option<UserID> {
        self.user_id
    }

    /// The ID of the logged in user.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] if the request has no valid session.
    pub fn require_user(&self) -> Result<UserID, Error> {
        self.user_id.ok_or(Error::Unauthenticated)
    }

    /// Replace the status message shown on the next rendered page.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.jar = set_status_cookie(self.jar.clone(), message.into());
    }

    /// Take the pending status message, clearing it for later requests.
    pub fn take_status(&mut self) -> Option<String> {
        let (jar, message) = take_status_cookie(self.jar.clone());
        self.jar = jar;

        message
    }

    /// Redirect the client to `location`, sending along any cookie changes.
    pub fn redirect(self, location: &str) -> Response {
        (self.jar, Redirect::to(location)).into_response()
    }

    /// Give back the cookie jar so it can be added to a response.
    pub fn into_jar(self) -> PrivateCookieJar {
        self.jar
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;

        Ok(Self::new(jar))
    }
}
