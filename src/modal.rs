//! The dialog that edit and delete views are shown in.
//!
//! A modal is loaded into the `#modal` element of the page and closed by
//! emptying that element again.

use maud::{Markup, PreEscaped, html};

/// The inline handler that closes whichever modal is open.
pub const CLOSE_MODAL: &str = "document.getElementById('modal').innerHTML = ''";

/// Wrap `content` in a dialog with a title and a close button.
pub fn modal(title: &str, content: &Markup) -> Markup {
    html! {
        div
            class="fixed inset-0 z-50 flex items-center justify-center px-4
                bg-black/50 backdrop-blur-sm"
        {
            div
                role="dialog"
                aria-modal="true"
                aria-labelledby="modal-title"
                class="relative w-full md:w-1/3 md:min-w-96 p-6 rounded-lg
                    bg-white dark:bg-gray-800 text-gray-900 dark:text-white"
            {
                button
                    type="button"
                    aria-label="Fechar"
                    class="absolute top-6 right-6 z-10 text-gray-500 transition
                        hover:text-gray-900 dark:hover:text-white"
                    onclick=(CLOSE_MODAL)
                {
                    (PreEscaped("&times;"))
                }

                h2 id="modal-title" class="mb-8 text-xl font-semibold" { (title) }

                (content)
            }
        }
    }
}

/// An out-of-band swap that closes the open modal.
pub fn close_modal_oob() -> Markup {
    html! {
        div id="modal" hx-swap-oob="innerHTML" {}
    }
}
