//! Defines the endpoint for downloading the logged in user's expenses as CSV.

use axum::{
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{
    Error,
    auth::RequestContext,
    endpoints,
    expense::{
        core::{ExpenseState, ExportRow, get_export_rows},
        form::{ExportFilter, ExportQuery},
    },
};

const EXPORT_ERROR_MSG: &str = "Export failed";
const CSV_HEADER: [&str; 3] = ["Date", "Category", "Amount"];

/// A route handler that responds with the logged in user's expenses as a
/// CSV attachment, oldest first.
///
/// The optional `from` and `to` dates are inclusive and only apply when both
/// are given. Clients without a session are sent to the log-in page.
pub async fn export_expenses_endpoint(
    State(state): State<ExpenseState>,
    context: RequestContext,
    Query(query): Query<ExportQuery>,
) -> Response {
    let Some(user_id) = context.user_id() else {
        return context.redirect(endpoints::LOG_IN);
    };

    let filter = match ExportFilter::try_from(query) {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    let csv = state
        .connection()
        .and_then(|connection| get_export_rows(user_id, &filter, &connection))
        .and_then(|rows| write_csv(&rows));

    match csv {
        Ok(csv) => (
            [
                (CONTENT_TYPE, "text/csv"),
                (CONTENT_DISPOSITION, "attachment; filename=\"expenses.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not export expenses for user {user_id}: {error}");
            (StatusCode::INTERNAL_SERVER_ERROR, EXPORT_ERROR_MSG).into_response()
        }
    }
}

/// Write the header line followed by one line per row.
///
/// Fields are never quoted, so a comma in a category shifts the columns of
/// that line.
fn write_csv(rows: &[ExportRow]) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for row in rows {
        writer
            .write_record([
                row.date.to_string(),
                row.category.clone(),
                row.amount.to_string(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

fn csv_error(error: csv::Error) -> Error {
    Error::CsvError(error.to_string())
}
