//! The service layer for the banking REST API.
//!
//! Route handlers only talk to the API through [StatementApi], which keeps
//! them testable without a running backend. [HttpStatementApi] is the real
//! implementation.

mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    account::Account,
    transaction::{Transaction, TransactionRequest},
};

pub use http::HttpStatementApi;

/// Shared handle to the API used by the route handlers.
pub type StatementApiRef = Arc<dyn StatementApi>;

/// Errors returned by the banking API or while talking to it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The bearer token was missing, invalid or expired.
    #[error("the API rejected the bearer token")]
    Unauthorized,

    /// The token is valid but may not access the resource.
    #[error("the API refused access to the resource")]
    Forbidden,

    /// The account or transaction does not exist on the backend.
    #[error("the API could not find the resource")]
    NotFound,

    /// The backend rejected the request body.
    #[error("the API rejected the request: {0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("the API returned an error: {0}")]
    Server(String),

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the API: {0}")]
    Transport(String),
}

/// The calls the statement module makes against the banking API.
///
/// Every call is authenticated with the caller's bearer `token`. There is no
/// retry, caching or batching.
#[async_trait]
pub trait StatementApi: Send + Sync {
    /// `GET account/{account_id}/statement`
    async fn list_transactions(
        &self,
        token: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ClientError>;

    /// `PUT account/transaction/{transaction_id}`
    async fn update_transaction(
        &self,
        token: &str,
        transaction_id: &str,
        payload: &TransactionRequest,
    ) -> Result<(), ClientError>;

    /// `DELETE account/transaction?accountId=..&transactionId=..`
    async fn delete_transaction(
        &self,
        token: &str,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<(), ClientError>;

    /// `GET account`
    async fn get_account(&self, token: &str) -> Result<Account, ClientError>;
}
