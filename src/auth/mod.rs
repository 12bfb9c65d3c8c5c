//! Session handling: the session cookie, the per-request context handlers
//! receive, and the log in/log out routes.

mod context;
mod cookie;
mod log_in;
mod log_out;

pub use context::RequestContext;
pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_session_cookie, set_session_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;

#[cfg(test)]
pub(crate) use cookie::{SESSION_COOKIE, STATUS_COOKIE};
