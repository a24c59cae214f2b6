//! The modal for editing a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::BearerToken,
    endpoints::{self, format_endpoint},
    modal::modal,
    transaction::{
        core::{AccountId, Transaction, TransactionId},
        form::{TransactionFormDefaults, format_amount_input, transaction_form_fields},
        ledger::LedgerKey,
        statement_page::StatementState,
        view::STATEMENT_ID,
    },
};

pub(crate) const EDIT_MODAL_TITLE: &str = "Editar Transação";
pub(crate) const SUBMIT_LABEL: &str = "Salvar Alterações";

fn edit_transaction_form(
    account_id: &str,
    transaction_id: &str,
    defaults: &TransactionFormDefaults<'_>,
) -> Markup {
    let endpoint = format_endpoint(endpoints::TRANSACTION_API, &[account_id, transaction_id]);

    html! {
        form
            hx-put=(endpoint)
            hx-encoding="multipart/form-data"
            hx-target={ "#" (STATEMENT_ID) }
            hx-target-400="this"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (transaction_form_fields(defaults, None))
        }
    }
}

fn edit_transaction_modal(account_id: &str, transaction: &Transaction) -> Markup {
    let amount = format_amount_input(transaction.value);
    let defaults = TransactionFormDefaults {
        transaction_type: Some(transaction.type_),
        amount: &amount,
        date: transaction.date,
        submit_label: SUBMIT_LABEL,
    };

    modal(
        EDIT_MODAL_TITLE,
        &edit_transaction_form(account_id, &transaction.id, &defaults),
    )
}

/// Render the edit modal, pre-filled from the local ledger.
pub async fn get_edit_transaction_page(
    State(state): State<StatementState>,
    Extension(token): Extension<BearerToken>,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
) -> Response {
    let key = LedgerKey::new(&token, &account_id);

    match state.ledgers.get_transaction(&key, &transaction_id) {
        Ok(transaction) => edit_transaction_modal(&account_id, &transaction).into_response(),
        Err(error) => error.into_alert_response(),
    }
}
