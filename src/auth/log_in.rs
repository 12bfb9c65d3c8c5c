//! This file defines the routes for displaying the log-in page and handling log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, UserID,
    auth::{RequestContext, set_session_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        status_banner,
    },
    user::get_user_by_email,
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_page(email: &str, message: Option<&str>) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Log in to your account" }

            (status_banner(message))

            form method="post" action=(endpoints::LOG_IN) class="w-full space-y-4"
            {
                div
                {
                    label for="email" class=(FORM_LABEL_STYLE) { "Email" }
                    input
                        type="email" name="email" id="email" required autofocus
                        value=(email) class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="password" class=(FORM_LABEL_STYLE) { "Password" }
                    input
                        type="password" name="password" id="password" required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }
            }
        }
    };

    base("Log In", &content)
}

/// Display the log-in page along with any pending status message,
/// e.g. "You must be logged in to add expenses."
pub async fn get_log_in_page(mut context: RequestContext) -> Response {
    let message = context.take_status();
    let page = log_in_page("", message.as_deref());

    (context.into_jar(), page).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session cookie is set and the client is
/// redirected to the add expense page. Otherwise, the log-in page is returned
/// with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    context: RequestContext,
    Form(user_data): Form<LogInData>,
) -> Response {
    match check_credentials(&state, &user_data) {
        Ok(user_id) => {
            let jar = set_session_cookie(context.into_jar(), user_id, state.cookie_duration);
            RequestContext::new(jar).redirect(endpoints::ADD)
        }
        Err(Error::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            log_in_page(&user_data.email, Some(INVALID_CREDENTIALS_ERROR_MSG)),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                log_in_page(&user_data.email, Some(INTERNAL_ERROR_MSG)),
            )
                .into_response()
        }
    }
}

fn check_credentials(state: &LoginState, user_data: &LogInData) -> Result<UserID, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user = match get_user_by_email(&user_data.email, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    if user.password_hash.verify(&user_data.password) {
        Ok(user.id)
    } else {
        Err(Error::InvalidCredentials)
    }
}
