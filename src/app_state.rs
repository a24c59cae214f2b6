//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use crate::{
    Error,
    client::{HttpStatementApi, StatementApiRef},
    transaction::LedgerStore,
};

/// The state of the server.
#[derive(Clone)]
pub struct AppState {
    /// The client for the banking REST API.
    pub api: StatementApiRef,

    /// The local copy of each account's statement.
    pub ledgers: LedgerStore,
}

impl AppState {
    /// Create a new [AppState] that talks to the banking API at `api_url`.
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `api_url` is not a valid URL.
    pub fn new(api_url: &str) -> Result<Self, Error> {
        let api = HttpStatementApi::new(api_url)?;

        Ok(Self::with_api(Arc::new(api)))
    }

    /// Create a new [AppState] backed by `api`.
    pub fn with_api(api: StatementApiRef) -> Self {
        Self {
            api,
            ledgers: LedgerStore::new(),
        }
    }
}
