//! Log-out route handler that invalidates the session cookie and redirects users.

use axum::response::Response;

use crate::{
    auth::{RequestContext, invalidate_session_cookie},
    endpoints,
};

/// Invalidate the session cookie and redirect the client to the log-in page.
pub async fn get_log_out(context: RequestContext) -> Response {
    let jar = invalidate_session_cookie(context.into_jar());

    RequestContext::new(jar).redirect(endpoints::LOG_IN)
}
