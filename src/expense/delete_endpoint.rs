//! Defines the endpoint for deleting an expense.

use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::{
    auth::RequestContext,
    endpoints,
    expense::{
        core::{ExpenseState, delete_expense},
        form::{LOG_IN_REQUIRED_MSG, parse_expense_id},
    },
};

pub const DELETE_SUCCESS_MSG: &str = "Expense deleted successfully!";
pub const DELETE_FAILURE_MSG: &str = "Failed to delete expense.";

/// A route handler for deleting one of the logged in user's expenses.
/// Redirects to the summary.
///
/// An ID that does not refer to one of the user's expenses deletes nothing
/// and is still reported as a success.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    mut context: RequestContext,
    Path(raw_expense_id): Path<String>,
) -> Response {
    let Some(user_id) = context.user_id() else {
        context.set_status(LOG_IN_REQUIRED_MSG);
        return context.redirect(endpoints::LOG_IN);
    };

    let expense_id = match parse_expense_id(&raw_expense_id) {
        Ok(expense_id) => expense_id,
        Err(error) => {
            context.set_status(error.to_string());
            return context.redirect(endpoints::SUMMARY);
        }
    };

    let result = state
        .connection()
        .and_then(|connection| delete_expense(expense_id, user_id, &connection));

    match result {
        Ok(rows_affected) => {
            tracing::debug!(
                "user {user_id} deleted expense {expense_id}, {rows_affected} row(s) removed"
            );
            context.set_status(DELETE_SUCCESS_MSG);
        }
        Err(error) => {
            tracing::error!("could not delete expense {expense_id}: {error}");
            context.set_status(DELETE_FAILURE_MSG);
        }
    }

    context.redirect(endpoints::SUMMARY)
}
