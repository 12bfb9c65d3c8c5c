//! Defines the endpoint for adding an expense.

use axum::{extract::State, response::Response};
// Must use axum_extra's Form since that parses an empty string as None instead
// of rejecting the whole form like axum::Form.
use axum_extra::extract::Form;

use crate::{
    auth::RequestContext,
    endpoints,
    expense::{
        core::{ExpenseState, create_expense},
        form::{AddExpenseForm, NewExpense},
    },
};

pub const LOG_IN_REQUIRED_MSG: &str = "You must be logged in to add expenses.";
pub const ADD_SUCCESS_MSG: &str = "Expense added successfully!";
pub const ADD_FAILURE_MSG: &str = "Error adding expense.";

/// A route handler for adding an expense for the logged in user.
///
/// Always redirects, leaving a status message for the next page: the log-in
/// page when there is no session, otherwise back to the add expense page.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    mut context: RequestContext,
    Form(form): Form<AddExpenseForm>,
) -> Response {
    let Some(user_id) = context.user_id() else {
        context.set_status(LOG_IN_REQUIRED_MSG);
        return context.redirect(endpoints::LOG_IN);
    };

    let expense = match NewExpense::try_from(form) {
        Ok(expense) => expense,
        Err(error) => {
            context.set_status(error.to_string());
            return context.redirect(endpoints::ADD);
        }
    };

    let result = state
        .connection()
        .and_then(|connection| create_expense(expense, user_id, &connection));

    match result {
        Ok(expense) => {
            tracing::debug!("user {user_id} added expense {}", expense.id);
            context.set_status(ADD_SUCCESS_MSG);
        }
        Err(error) => {
            tracing::error!("could not add expense for user {user_id}: {error}");
            context.set_status(ADD_FAILURE_MSG);
        }
    }

    context.redirect(endpoints::ADD)
}
