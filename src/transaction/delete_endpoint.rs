//! The endpoint that deletes a transaction once the user confirms.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    alert::Alert,
    auth::BearerToken,
    error::Operation,
    modal::close_modal_oob,
    transaction::{
        core::{AccountId, TransactionId},
        ledger::LedgerKey,
        statement_page::{StatementState, ledger_after_write},
        view::statement_content,
    },
};

/// A route handler for deleting a transaction.
///
/// The transaction is removed from the local ledger only after the banking
/// API confirms the deletion. Responds with the re-rendered statement, or an
/// alert if the API call fails.
pub async fn delete_transaction_endpoint(
    State(state): State<StatementState>,
    Extension(token): Extension<BearerToken>,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
) -> Response {
    let key = LedgerKey::new(&token, &account_id);

    if let Err(error) = state.ledgers.get_transaction(&key, &transaction_id) {
        return error.into_alert_response();
    }

    if let Err(error) = state
        .api
        .delete_transaction(token.as_str(), &account_id, &transaction_id)
        .await
    {
        return Error::Api(Operation::DeleteTransaction, error).into_alert_response();
    }

    let removed = state.ledgers.remove(&key, &transaction_id);
    let ledger = match ledger_after_write(&state, &token, &account_id, removed).await {
        Ok(ledger) => ledger,
        Err(error) => return error.into_alert_response(),
    };

    let alert = Alert::SuccessSimple {
        message: "Transação excluída.".to_owned(),
    };
    let body = html! {
        (statement_content(&account_id, &ledger))
        (close_modal_oob())
        (alert.into_oob_markup())
    };

    body.into_response()
}
