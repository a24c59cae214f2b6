//! Download of the file attached to a transaction.
//!
//! Attachments are stored on the transaction as `data:` URLs, so the file is
//! decoded from the local ledger instead of being fetched again.

use axum::{
    Extension,
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    Error,
    auth::BearerToken,
    transaction::{
        core::{AccountId, TransactionId},
        ledger::LedgerKey,
        statement_page::StatementState,
    },
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A decoded attachment.
#[derive(Debug, PartialEq)]
struct DecodedAttachment {
    mime_type: String,
    bytes: Vec<u8>,
}

/// Decode a `data:<mime>;base64,<payload>` URL, or a bare base64 payload.
fn decode_attachment(attachment: &str) -> Option<DecodedAttachment> {
    let (mime_type, payload) = match attachment.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',')?;
            let mime_type = header.split(';').next().unwrap_or_default();
            let mime_type = if mime_type.is_empty() {
                FALLBACK_MIME_TYPE
            } else {
                mime_type
            };

            (mime_type, payload)
        }
        None => (FALLBACK_MIME_TYPE, attachment),
    };

    let bytes = STANDARD.decode(payload.trim()).ok()?;

    Some(DecodedAttachment {
        mime_type: mime_type.to_owned(),
        bytes,
    })
}

fn file_extension(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        "application/octet-stream" => "bin",
        mime_type => mime_type
            .rsplit_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| subtype.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    }
}

fn file_name(transaction_id: &str, mime_type: &str) -> String {
    let id: String = transaction_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    format!("anexo-{id}.{}", file_extension(mime_type))
}

/// Respond with the attachment of a transaction in the local ledger as a
/// file download.
pub async fn get_transaction_attachment(
    State(state): State<StatementState>,
    Extension(token): Extension<BearerToken>,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
) -> Response {
    let key = LedgerKey::new(&token, &account_id);

    let transaction = match state.ledgers.get_transaction(&key, &transaction_id) {
        Ok(transaction) => transaction,
        Err(error) => return error.into_response(),
    };

    let Some(attachment) = transaction.attachment.as_deref().and_then(decode_attachment) else {
        tracing::debug!("Transaction {transaction_id} has no readable attachment");
        return Error::AttachmentNotFound.into_response();
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        file_name(&transaction_id, &attachment.mime_type)
    );

    (
        [
            (CONTENT_TYPE, attachment.mime_type),
            (CONTENT_DISPOSITION, disposition),
        ],
        attachment.bytes,
    )
        .into_response()
}
