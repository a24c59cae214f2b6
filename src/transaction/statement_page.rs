//! The statement page, which fetches the account's transactions and replaces
//! the local ledger with them.

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    auth::BearerToken,
    client::StatementApiRef,
    error::Operation,
    transaction::{
        core::AccountId,
        ledger::{Ledger, LedgerKey, LedgerStore},
        view::statement_page_view,
    },
};

/// The state needed by the statement page and the endpoints that change it.
#[derive(Clone)]
pub struct StatementState {
    /// The client for the banking API.
    pub api: StatementApiRef,
    /// The local copy of each account's statement.
    pub ledgers: LedgerStore,
}

impl FromRef<AppState> for StatementState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            ledgers: state.ledgers.clone(),
        }
    }
}

/// Fetch the account's statement from the API and store it as the caller's
/// ledger.
///
/// # Errors
/// Returns [Error::Api] if the API call fails, or [Error::LedgerLockError] if
/// the ledger lock is poisoned.
pub(crate) async fn fetch_ledger(
    state: &StatementState,
    token: &BearerToken,
    account_id: &str,
) -> Result<Ledger, Error> {
    let transactions = state
        .api
        .list_transactions(token.as_str(), account_id)
        .await
        .map_err(|error| Error::Api(Operation::FetchStatement, error))?;

    tracing::debug!(
        "Fetched {} transactions for account {account_id}",
        transactions.len()
    );

    state
        .ledgers
        .set(&LedgerKey::new(token, account_id), transactions)
}

/// Return the ledger after an update or delete the API has accepted.
///
/// `patched` is the result of applying the change to the local ledger. If the
/// ledger was reloaded or dropped while the API call was in flight, the
/// statement is fetched again so the response still shows the change.
pub(crate) async fn ledger_after_write(
    state: &StatementState,
    token: &BearerToken,
    account_id: &str,
    patched: Result<Ledger, Error>,
) -> Result<Ledger, Error> {
    match patched {
        Err(Error::LedgerNotLoaded | Error::TransactionNotFound) => {
            tracing::debug!(
                "The ledger for account {account_id} changed during the API call, fetching it again"
            );
            fetch_ledger(state, token, account_id).await
        }
        patched => patched,
    }
}

/// Render the statement page for an account.
pub async fn get_statement_page(
    State(state): State<StatementState>,
    Extension(token): Extension<BearerToken>,
    Path(account_id): Path<AccountId>,
) -> Response {
    match fetch_ledger(&state, &token, &account_id).await {
        Ok(ledger) => statement_page_view(&account_id, &ledger).into_response(),
        Err(error) => error.into_response(),
    }
}
