//! HTML rendering for the statement: the ledger list and the pie chart.

use maud::{Markup, html};

use crate::{
    chart::{PieSummary, pie_chart_view},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, ButtonVariant, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency,
    },
    transaction::{core::Transaction, ledger::Ledger},
};

/// The ID of the element that statement updates are swapped into.
pub const STATEMENT_ID: &str = "statement";

/// The message shown when the account has no transactions.
pub const EMPTY_STATEMENT_MESSAGE: &str = "Nenhuma transação cadastrada.";

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn transaction_row(account_id: &str, transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(
        endpoints::EDIT_TRANSACTION_VIEW,
        &[account_id, &transaction.id],
    );
    let delete_url = format_endpoint(
        endpoints::DELETE_TRANSACTION_VIEW,
        &[account_id, &transaction.id],
    );
    let amount = transaction.display_amount();

    html! {
        li
            data-transaction-id=(transaction.id)
            class="flex flex-col md:flex-row md:items-center gap-1 md:gap-4 p-3
                border-b-2 border-dashed border-green-600 dark:border-green-800"
        {
            span class="text-sm font-semibold capitalize text-green-700 dark:text-green-400"
            {
                (transaction.month_name())
            }

            p class="flex justify-between items-center gap-4"
            {
                span data-type { (transaction.type_.label()) }
                span class="text-sm text-gray-400" { (transaction.display_date()) }
            }

            p data-amount class={ "font-mono font-semibold break-all " (amount_class(amount)) }
            {
                (format_currency(amount))
            }

            div class="flex gap-4 md:ml-auto"
            {
                @if transaction.attachment.is_some()
                {
                    a
                        href=(format_endpoint(
                            endpoints::TRANSACTION_ATTACHMENT,
                            &[account_id, &transaction.id],
                        ))
                        download
                        title="Baixar anexo"
                        class=(LINK_STYLE)
                    {
                        "Anexo"
                    }
                }

                button
                    type="button"
                    title="Editar"
                    hx-get=(edit_url)
                    hx-target="#modal"
                    hx-target-error="#alert-container"
                    class=(ButtonVariant::Tertiary.style())
                {
                    "Editar"
                }

                button
                    type="button"
                    title="Deletar"
                    hx-get=(delete_url)
                    hx-target="#modal"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Deletar"
                }
            }
        }
    }
}

/// The ledger list and the pie chart, without the element they are swapped
/// into.
pub fn statement_content(account_id: &str, ledger: &Ledger) -> Markup {
    let transactions = ledger.transactions();

    html! {
        div class="grid grid-cols-1 lg:grid-cols-[2fr_1fr] gap-4 w-full"
        {
            section class="w-full p-6 rounded-lg bg-white dark:bg-gray-800"
            {
                h2 class="mb-6 text-xl font-bold" { "Extrato" }

                @if ledger.is_empty()
                {
                    p class="text-center" { (EMPTY_STATEMENT_MESSAGE) }
                }
                @else
                {
                    ul class="overflow-y-auto max-h-[630px] lg:max-h-[400px] rounded-lg"
                    {
                        @for transaction in transactions
                        {
                            (transaction_row(account_id, transaction))
                        }
                    }
                }
            }

            (pie_chart_view(PieSummary::from_transactions(transactions)))
        }
    }
}

/// The statement wrapped in the element that HTMX swaps updates into.
pub fn statement_section(account_id: &str, ledger: &Ledger) -> Markup {
    html! {
        div id=(STATEMENT_ID) class="w-full"
        {
            (statement_content(account_id, ledger))
        }
    }
}

/// The full statement page.
pub fn statement_page_view(account_id: &str, ledger: &Ledger) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            (statement_section(account_id, ledger))
        }
    };

    base(
        "Extrato",
        &[HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned())],
        &content,
    )
}
