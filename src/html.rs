//! Shared maud markup for the log in and add expense pages.

use maud::{DOCTYPE, Markup, html};

pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 underline";

pub const BUTTON_PRIMARY_STYLE: &str =
    "w-full px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded";

pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 mx-auto max-w-md";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium";
pub const FORM_TEXT_INPUT_STYLE: &str =
    "block w-full p-2.5 rounded text-sm bg-gray-50 border border-gray-300";

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Expense Tracker" }
            }

            body { (content) }
        }
    }
}

/// The status message left by the previous request, if there is one.
pub fn status_banner(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p id="status" role="status" class="mb-4 p-3 rounded bg-gray-100" { (message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{base, status_banner};

    #[test]
    fn status_banner_renders_message() {
        let markup = base("Test", &status_banner(Some("Expense added successfully!")));
        let document = Html::parse_document(&markup.into_string());

        let selector = Selector::parse("#status").unwrap();
        let text: String = document.select(&selector).flat_map(|e| e.text()).collect();

        assert_eq!(text, "Expense added successfully!");
    }

    #[test]
    fn status_banner_is_empty_without_message() {
        assert_eq!(status_banner(None).into_string(), "");
    }
}
