//! The account the statement belongs to and the route that finds it.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    AppState, Error,
    auth::BearerToken,
    client::StatementApiRef,
    endpoints::{self, format_endpoint},
    error::Operation,
    transaction::AccountId,
};

/// A bank account as returned by the API.
///
/// Only the ID is used by this module; every other field is kept as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// The `data` of an account response, which is a single account in some API
/// versions and a list of accounts in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AccountPayload {
    One(Account),
    Many(Vec<Account>),
}

impl AccountPayload {
    pub(crate) fn into_account(self) -> Option<Account> {
        match self {
            AccountPayload::One(account) => Some(account),
            AccountPayload::Many(accounts) => accounts.into_iter().next(),
        }
    }
}

/// The state needed to look up the caller's account.
#[derive(Clone)]
pub struct AccountState {
    pub api: StatementApiRef,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The root path '/' redirects to the statement of the caller's account.
pub async fn get_index_page(
    State(state): State<AccountState>,
    Extension(token): Extension<BearerToken>,
) -> Response {
    match state.api.get_account(token.as_str()).await {
        Ok(account) => Redirect::to(&format_endpoint(
            endpoints::STATEMENT_VIEW,
            &[&account.id],
        ))
        .into_response(),
        Err(error) => Error::Api(Operation::FetchAccount, error).into_response(),
    }
}
