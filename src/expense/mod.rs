//! Recording, summarising and exporting a user's expenses.

mod add_page;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod form;
mod month;
mod summary_endpoint;

pub use add_page::get_add_expense_page;
pub use self::core::create_expense_table;
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use export_endpoint::export_expenses_endpoint;
pub use summary_endpoint::{get_filtered_summary, get_summary};
