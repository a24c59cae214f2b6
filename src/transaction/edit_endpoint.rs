//! The endpoint that saves the edit form.
//!
//! The update is sent to the banking API first and the local ledger is only
//! patched once the API accepts it.

use axum::{
    Extension,
    extract::{Multipart, Path, State},
    http::StatusCode,
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
        core::{AccountId, TransactionId, TransactionRequest, TransactionType, parse_wire_date},
        edit_page::SUBMIT_LABEL,
        form::{
            RawTransactionForm, TransactionFormDefaults, read_multipart_form,
            transaction_form_fields,
        },
        ledger::{LedgerKey, TransactionPatch},
        statement_page::{StatementState, ledger_after_write},
        view::statement_content,
    },
};

/// Update a transaction from the submitted edit form.
///
/// Responds with the re-rendered statement and closes the modal on success,
/// the form with an error message for invalid input, or an alert if the API
/// call fails.
pub async fn update_transaction_endpoint(
    State(state): State<StatementState>,
    Extension(token): Extension<BearerToken>,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
    multipart: Multipart,
) -> Response {
    let key = LedgerKey::new(&token, &account_id);

    let transaction = match state.ledgers.get_transaction(&key, &transaction_id) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    let form = match read_multipart_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(),
    };

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(error) => {
            tracing::debug!("Rejected edit of transaction {transaction_id}: {error}");
            let defaults = defaults_from_submitted(&form, transaction.date);
            // The form swaps its own contents for these fields on a 400.
            let fields = transaction_form_fields(&defaults, Some(&error.to_string()));

            return (StatusCode::BAD_REQUEST, fields).into_response();
        }
    };

    let payload = TransactionRequest {
        account_id: account_id.clone(),
        type_: submission.type_,
        value: submission.signed_value(),
        date: submission.date,
        attachment: submission.attachment.clone(),
    };

    if let Err(error) = state
        .api
        .update_transaction(token.as_str(), &transaction_id, &payload)
        .await
    {
        return Error::Api(Operation::UpdateTransaction, error).into_alert_response();
    }

    let patch = TransactionPatch {
        type_: payload.type_,
        value: payload.value,
        date: payload.date,
        attachment: payload.attachment,
    };

    let patched = state.ledgers.replace(&key, &transaction_id, patch);
    let ledger = match ledger_after_write(&state, &token, &account_id, patched).await {
        Ok(ledger) => ledger,
        Err(error) => return error.into_alert_response(),
    };

    let alert = Alert::SuccessSimple {
        message: "Transação atualizada.".to_owned(),
    };
    let body = html! {
        (statement_content(&account_id, &ledger))
        (close_modal_oob())
        (alert.into_oob_markup())
    };

    body.into_response()
}

/// Keep what the user typed when the form is shown again with an error.
fn defaults_from_submitted(
    form: &RawTransactionForm,
    fallback_date: time::Date,
) -> TransactionFormDefaults<'_> {
    TransactionFormDefaults {
        transaction_type: TransactionType::from_form_value(form.transaction_type.trim()),
        amount: &form.amount,
        date: parse_wire_date(&form.date).unwrap_or(fallback_date),
        submit_label: SUBMIT_LABEL,
    }
}
