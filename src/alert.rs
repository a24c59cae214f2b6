//! Alert messages shown at the bottom of the page after an HTMX request.
//!
//! Alerts end up in the `#alert-container` element that [crate::html::base]
//! places on every page. Error responses are swapped there through
//! `hx-target-error`, other responses append [Alert::into_oob_markup].

use axum::response::Html;
use maud::{Markup, html};

/// A dismissable success or error message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    SuccessSimple { message: String },
    Error { message: String, details: String },
}

impl Alert {
    fn parts(&self) -> (bool, &str, &str) {
        match self {
            Alert::SuccessSimple { message } => (true, message, ""),
            Alert::Error { message, details } => (false, message, details),
        }
    }

    pub fn into_markup(self) -> Markup {
        let (is_success, message, details) = self.parts();
        let colours = if is_success {
            "text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 \
            dark:text-green-400 dark:border-green-800"
        } else {
            "text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 \
            dark:text-red-400 dark:border-red-800"
        };

        html! {
            div
                role="alert"
                data-alert-kind=(if is_success { "success" } else { "error" })
                class={ "flex items-start gap-3 p-4 mb-4 border rounded " (colours) }
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p class="text-sm mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Fechar"
                    class="ms-auto font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// The alert wrapped for an out-of-band swap, so it can be appended to a
    /// response whose main content targets another element.
    pub fn into_oob_markup(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_markup())
            }
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}
