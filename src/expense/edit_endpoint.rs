//! Defines the endpoint for changing an existing expense.

use axum::{extract::State, response::Response};
use axum_extra::extract::Form;

use crate::{
    auth::RequestContext,
    endpoints,
    expense::{
        core::{ExpenseState, update_expense},
        form::{EditExpenseForm, ExpenseUpdate, LOG_IN_REQUIRED_MSG},
    },
};

pub const UPDATE_SUCCESS_MSG: &str = "Expense updated successfully!";
pub const UPDATE_FAILURE_MSG: &str = "Failed to update expense.";

/// A route handler for setting the date, category and amount of one of the
/// logged in user's expenses. Redirects to the summary.
///
/// An ID that does not refer to one of the user's expenses changes nothing
/// and is still reported as a success.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    mut context: RequestContext,
    Form(form): Form<EditExpenseForm>,
) -> Response {
    let Some(user_id) = context.user_id() else {
        context.set_status(LOG_IN_REQUIRED_MSG);
        return context.redirect(endpoints::LOG_IN);
    };

    let update = match ExpenseUpdate::try_from(form) {
        Ok(update) => update,
        Err(error) => {
            context.set_status(error.to_string());
            return context.redirect(endpoints::SUMMARY);
        }
    };

    let result = state
        .connection()
        .and_then(|connection| update_expense(&update, user_id, &connection));

    match result {
        Ok(rows_affected) => {
            tracing::debug!(
                "user {user_id} edited expense {}, {rows_affected} row(s) changed",
                update.id
            );
            context.set_status(UPDATE_SUCCESS_MSG);
        }
        Err(error) => {
            tracing::error!("could not update expense {}: {error}", update.id);
            context.set_status(UPDATE_FAILURE_MSG);
        }
    }

    context.redirect(endpoints::SUMMARY)
}
