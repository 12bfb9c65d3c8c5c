//! Defines the route handler for the page for adding an expense.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    auth::RequestContext,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base, status_banner,
    },
};

fn add_expense_view(message: Option<&str>) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Add Expense" }

            (status_banner(message))

            form method="post" action=(endpoints::ADD) class="w-full space-y-4"
            {
                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    input
                        name="category"
                        id="category"
                        type="text"
                        placeholder="Food"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        name="date"
                        id="date"
                        type="date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
            }

            nav class="mt-6 flex gap-4"
            {
                a href=(endpoints::SUMMARY) class=(LINK_STYLE) { "Summary" }
                a href=(endpoints::EXPORT) class=(LINK_STYLE) { "Export CSV" }
                a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Log out" }
            }
        }
    };

    base("Add Expense", &content)
}

/// Display the add expense form along with the status message of the last
/// action, e.g. "Expense added successfully!".
///
/// Clients without a session are sent to the log-in page.
pub async fn get_add_expense_page(mut context: RequestContext) -> Response {
    if context.user_id().is_none() {
        return context.redirect(endpoints::LOG_IN);
    }

    let message = context.take_status();

    (context.into_jar(), add_expense_view(message.as_deref())).into_response()
}
