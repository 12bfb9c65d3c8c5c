//! Defines the JSON endpoints for per-category and monthly totals.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    auth::RequestContext,
    expense::{
        core::{ExpenseState, get_category_totals, get_month_total},
        form::{FilteredSummaryQuery, MonthFilter},
    },
};

const SUMMARY_ERROR_MSG: &str = "Error retrieving summary";
const FILTERED_SUMMARY_ERROR_MSG: &str = "Error calculating filtered summary";

/// The response body of the monthly total.
#[derive(Debug, Serialize)]
struct MonthTotal {
    total: f64,
}

/// Get the logged in user's all-time total per category as a JSON array of
/// `{"category", "total"}` objects.
pub async fn get_summary(State(state): State<ExpenseState>, context: RequestContext) -> Response {
    let user_id = match context.require_user() {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    match state
        .connection()
        .and_then(|connection| get_category_totals(user_id, &connection))
    {
        Ok(totals) => Json(totals).into_response(),
        Err(error) => {
            tracing::error!("could not get category totals for user {user_id}: {error}");
            (StatusCode::INTERNAL_SERVER_ERROR, SUMMARY_ERROR_MSG).into_response()
        }
    }
}

/// Get the logged in user's total for the month given as `YYYY-MM`,
/// optionally restricted to one category.
///
/// An invalid month is rejected before the database is queried.
pub async fn get_filtered_summary(
    State(state): State<ExpenseState>,
    context: RequestContext,
    Query(query): Query<FilteredSummaryQuery>,
) -> Response {
    let user_id = match context.require_user() {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    let filter = match MonthFilter::try_from(query) {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    match state
        .connection()
        .and_then(|connection| get_month_total(user_id, &filter, &connection))
    {
        Ok(total) => Json(MonthTotal { total }).into_response(),
        Err(error) => {
            tracing::error!(
                "could not get total for {} for user {user_id}: {error}",
                filter.month
            );
            (StatusCode::INTERNAL_SERVER_ERROR, FILTERED_SUMMARY_ERROR_MSG).into_response()
        }
    }
}
