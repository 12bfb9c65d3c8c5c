//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{get_log_in_page, get_log_out, post_log_in},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        export_expenses_endpoint, get_add_expense_page, get_filtered_summary, get_summary,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
///
/// Every expense route checks the session itself, so there is no auth layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::ADD,
            get(get_add_expense_page).post(create_expense_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary))
        .route(endpoints::FILTERED_SUMMARY, get(get_filtered_summary))
        .route(endpoints::EDIT, post(edit_expense_endpoint))
        .route(endpoints::DELETE, post(delete_expense_endpoint))
        .route(endpoints::EXPORT, get(export_expenses_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the add expense page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::ADD)
}
