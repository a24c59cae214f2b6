//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    client::ClientError,
    html::error_view,
    internal_server_error::{InternalServerError, get_internal_server_error_redirect},
    not_found::NotFoundError,
};

/// The calls made against the banking API, used to pick the message shown
/// when one of them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Listing the transactions of an account.
    FetchStatement,
    /// Saving an edited transaction.
    UpdateTransaction,
    /// Deleting a transaction.
    DeleteTransaction,
    /// Looking up the caller's account.
    FetchAccount,
}

impl Operation {
    /// The single user-facing message for a failure of this operation.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::FetchStatement => "Não foi possível carregar o extrato",
            Operation::UpdateTransaction => "Não foi possível atualizar a transação",
            Operation::DeleteTransaction => "Não foi possível excluir a transação",
            Operation::FetchAccount => "Não foi possível carregar a conta",
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request had neither an `Authorization: Bearer` header nor a token
    /// cookie.
    #[error("no bearer token in the request")]
    MissingToken,

    /// A call to the banking API failed.
    #[error("{0:?} failed: {1}")]
    Api(Operation, ClientError),

    /// The statement for the account has not been fetched since the server
    /// started, so there is no local copy to edit.
    #[error("the statement for the account has not been loaded")]
    LedgerNotLoaded,

    /// The transaction is not in the local copy of the statement.
    #[error("the transaction is not in the loaded statement")]
    TransactionNotFound,

    /// The transaction has no attachment, or the attachment is not valid base64.
    #[error("the transaction has no readable attachment")]
    AttachmentNotFound,

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// Could not acquire the ledger lock.
    #[error("could not acquire the ledger lock")]
    LedgerLockError,

    /// The configured API base URL could not be parsed.
    #[error("invalid API URL: {0}")]
    InvalidApiUrl(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MissingToken => (
                StatusCode::UNAUTHORIZED,
                error_view(
                    "Sessão expirada",
                    "401",
                    "Sessão expirada",
                    "Entre novamente na sua conta para ver o extrato.",
                ),
            )
                .into_response(),
            Error::LedgerNotLoaded
            | Error::TransactionNotFound
            | Error::AttachmentNotFound => NotFoundError.into_response(),
            // Every API failure gets the same message, whatever the cause.
            Error::Api(operation, error) => {
                tracing::error!("{operation:?} failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    error_view(
                        "Erro",
                        "502",
                        operation.failure_message(),
                        "Tente novamente mais tarde.",
                    ),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Sessão expirada".to_owned(),
                    details: "Entre novamente na sua conta e tente outra vez.".to_owned(),
                },
            ),
            Error::Api(operation, error) => {
                tracing::error!("{operation:?} failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: operation.failure_message().to_owned(),
                        details: "Tente novamente mais tarde.".to_owned(),
                    },
                )
            }
            Error::LedgerNotLoaded | Error::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Transação não encontrada".to_owned(),
                    details: "Recarregue a página para ver o extrato atualizado.".to_owned(),
                },
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Formulário inválido".to_owned(),
                    details,
                },
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return get_internal_server_error_redirect();
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
