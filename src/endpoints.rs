//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete/{expense_id}', use [format_endpoint].

/// The root route which redirects to the add expense page.
pub const ROOT: &str = "/";
/// The route for the log in page and log in form submissions.
pub const LOG_IN: &str = "/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/log_out";
/// The page for adding an expense and the route the add form posts to.
pub const ADD: &str = "/add";
/// The per-category totals for the current user.
pub const SUMMARY: &str = "/summary";
/// The total for a month, optionally restricted to a category.
pub const FILTERED_SUMMARY: &str = "/filtered-summary";
/// The route for editing an expense.
pub const EDIT: &str = "/edit";
/// The route for deleting an expense.
pub const DELETE: &str = "/delete/{expense_id}";
/// The route for downloading expenses as a CSV file.
pub const EXPORT: &str = "/export";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete/{expense_id}', '{expense_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
