//! [StatementApi] over HTTP with reqwest.

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;

use crate::{
    Error,
    account::{Account, AccountPayload},
    client::{ClientError, StatementApi},
    transaction::{Transaction, TransactionRequest},
};

/// The body the API wraps every successful response in.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct StatementData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// The body of an unsuccessful response, when the API sends one.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "error")]
    message: String,
}

/// Talks to the banking API at a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpStatementApi {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpStatementApi {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:5000/`.
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `base_url` is not an absolute URL
    /// with a path, e.g. `mailto:` URLs.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url =
            Url::parse(base_url).map_err(|error| Error::InvalidApiUrl(error.to_string()))?;

        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidApiUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Append `segments` to the base path.
    ///
    /// Each segment is percent-encoded, so IDs containing `/`, `?` or `#`
    /// cannot leave the base path or add a query.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| ClientError::Server(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}

#[async_trait]
impl StatementApi for HttpStatementApi {
    async fn list_transactions(
        &self,
        token: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ClientError> {
        let endpoint = self.endpoint(&["account", account_id, "statement"])?;

        let response = self
            .http
            .get(endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope = check_status(response)
            .await?
            .json::<Envelope<StatementData>>()
            .await
            .map_err(transport_error)?;

        Ok(envelope.data.transactions)
    }

    async fn update_transaction(
        &self,
        token: &str,
        transaction_id: &str,
        payload: &TransactionRequest,
    ) -> Result<(), ClientError> {
        let endpoint = self.endpoint(&["account", "transaction", transaction_id])?;

        let response = self
            .http
            .put(endpoint)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await.map(|_| ())
    }

    async fn delete_transaction(
        &self,
        token: &str,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<(), ClientError> {
        let endpoint = self.endpoint(&["account", "transaction"])?;

        let response = self
            .http
            .delete(endpoint)
            .bearer_auth(token)
            .query(&[("accountId", account_id), ("transactionId", transaction_id)])
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await.map(|_| ())
    }

    async fn get_account(&self, token: &str) -> Result<Account, ClientError> {
        let endpoint = self.endpoint(&["account"])?;

        let response = self
            .http
            .get(endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope = check_status(response)
            .await?
            .json::<Envelope<AccountPayload>>()
            .await
            .map_err(transport_error)?;

        envelope.data.into_account().ok_or(ClientError::NotFound)
    }
}

fn transport_error(error: reqwest::Error) -> ClientError {
    ClientError::Transport(error.to_string())
}

/// Pass successful responses through and map the rest onto [ClientError].
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .json::<ErrorResponse>()
        .await
        .map(|error| error.message)
        .unwrap_or_else(|_| "unknown error".to_owned());

    tracing::debug!("API responded with {status}: {body}");

    let error = match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(body)
        }
        _ => ClientError::Server(body),
    };

    Err(error)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::{delete, get, put},
    };
    use serde_json::{Value, json};
    use time::macros::date;
    use tokio::net::TcpListener;

    use crate::{
        Error,
        client::{ClientError, HttpStatementApi, StatementApi},
        transaction::{TransactionRequest, TransactionType},
    };

    const TOKEN: &str = "secret-token";

    /// What the fake backend saw, so tests can check the wire format.
    #[derive(Debug, Default)]
    struct Recorded {
        update_body: Option<Value>,
        update_id: Option<String>,
        delete_query: Option<HashMap<String, String>>,
    }

    type Shared = Arc<Mutex<Recorded>>;

    fn is_authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer secret-token")
    }

    async fn statement_handler(Path(account_id): Path<String>, headers: HeaderMap) -> Response {
        if !is_authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no"}))).into_response();
        }

        if account_id == "missing" {
            return (StatusCode::NOT_FOUND, Json(json!({"message": "no account"})))
                .into_response();
        }

        Json(json!({
            "message": "ok",
            "data": {
                "transactions": [
                    {
                        "id": "t1",
                        "type": "Debit",
                        "value": -50.0,
                        "date": "2024-05-01T00:00:00.000Z",
                        "accountId": account_id,
                    },
                    {
                        "id": "t2",
                        "type": "deposit",
                        "value": 100.0,
                        "date": "2024-05-02",
                        "accountId": account_id,
                        "anexo": "aGVsbG8=",
                    }
                ]
            }
        }))
        .into_response()
    }

    async fn update_handler(
        State(recorded): State<Shared>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        if !is_authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        if body["value"] == json!(-1.0) {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "invalid value"})),
            )
                .into_response();
        }

        let mut recorded = recorded.lock().unwrap();
        recorded.update_id = Some(id);
        recorded.update_body = Some(body);

        StatusCode::OK.into_response()
    }

    async fn delete_handler(
        State(recorded): State<Shared>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        if !is_authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        recorded.lock().unwrap().delete_query = Some(query);

        StatusCode::NO_CONTENT.into_response()
    }

    async fn account_handler(headers: HeaderMap) -> Response {
        if !is_authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        Json(json!({
            "data": [{ "id": "acc-1", "type": "Debit", "userId": "u1" }]
        }))
        .into_response()
    }

    /// Start a fake banking API on an ephemeral port and return a client for
    /// it mounted under `/api`.
    async fn start_fake_api() -> (HttpStatementApi, Shared) {
        let recorded = Shared::default();
        let api = Router::new()
            .route("/account/{account_id}/statement", get(statement_handler))
            .route("/account/transaction/{id}", put(update_handler))
            .route("/account/transaction", delete(delete_handler))
            .route("/account", get(account_handler))
            .with_state(recorded.clone());
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("could not bind test listener");
        let address = listener.local_addr().expect("could not get local address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("fake API server failed");
        });

        let client = HttpStatementApi::new(&format!("http://{address}/api"))
            .expect("could not create client");

        (client, recorded)
    }

    #[tokio::test]
    async fn lists_transactions_from_envelope() {
        let (client, _) = start_fake_api().await;

        let transactions = client
            .list_transactions(TOKEN, "acc-1")
            .await
            .expect("could not list transactions");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, "t1");
        assert_eq!(transactions[0].date, date!(2024 - 05 - 01));
        assert_eq!(transactions[1].type_, TransactionType::Credit);
        assert_eq!(transactions[1].attachment.as_deref(), Some("aGVsbG8="));
        assert_eq!(transactions[1].account_id, "acc-1");
    }

    #[tokio::test]
    async fn maps_status_codes_to_errors() {
        let (client, _) = start_fake_api().await;

        assert_eq!(
            client.list_transactions("wrong", "acc-1").await,
            Err(ClientError::Unauthorized)
        );
        assert_eq!(
            client.list_transactions(TOKEN, "missing").await,
            Err(ClientError::NotFound)
        );
    }

    #[tokio::test]
    async fn sends_update_payload_as_json() {
        let (client, recorded) = start_fake_api().await;
        let payload = TransactionRequest {
            account_id: "acc-1".to_owned(),
            type_: TransactionType::Debit,
            value: -25.5,
            date: Some(date!(2024 - 06 - 01)),
            attachment: None,
        };

        client
            .update_transaction(TOKEN, "t1", &payload)
            .await
            .expect("could not update transaction");

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.update_id.as_deref(), Some("t1"));
        assert_eq!(
            recorded.update_body,
            Some(json!({
                "accountId": "acc-1",
                "type": "Debit",
                "value": -25.5,
                "date": "2024-06-01",
            }))
        );
    }

    #[tokio::test]
    async fn update_rejection_carries_api_message() {
        let (client, _) = start_fake_api().await;
        let payload = TransactionRequest {
            account_id: "acc-1".to_owned(),
            type_: TransactionType::Debit,
            value: -1.0,
            date: None,
            attachment: None,
        };

        let got = client.update_transaction(TOKEN, "t1", &payload).await;

        assert_eq!(got, Err(ClientError::Validation("invalid value".to_owned())));
    }

    #[tokio::test]
    async fn sends_delete_ids_as_query_parameters() {
        let (client, recorded) = start_fake_api().await;

        client
            .delete_transaction(TOKEN, "acc-1", "t2")
            .await
            .expect("could not delete transaction");

        let query = recorded
            .lock()
            .unwrap()
            .delete_query
            .clone()
            .expect("delete was not called");
        assert_eq!(query.get("accountId").map(String::as_str), Some("acc-1"));
        assert_eq!(query.get("transactionId").map(String::as_str), Some("t2"));
    }

    #[tokio::test]
    async fn gets_first_account() {
        let (client, _) = start_fake_api().await;

        let account = client.get_account(TOKEN).await.expect("could not get account");

        assert_eq!(account.id, "acc-1");
        assert_eq!(account.details.get("userId"), Some(&json!("u1")));
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        let client = HttpStatementApi::new("http://127.0.0.1:1/").expect("could not create client");

        let got = client.list_transactions(TOKEN, "acc-1").await;

        assert!(
            matches!(got, Err(ClientError::Transport(_))),
            "want transport error, got {got:?}"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        let got = HttpStatementApi::new("not a url");

        assert!(matches!(got, Err(Error::InvalidApiUrl(_))));
    }

    #[test]
    fn rejects_base_url_without_a_path() {
        let got = HttpStatementApi::new("mailto:bank@example.com");

        assert!(matches!(got, Err(Error::InvalidApiUrl(_))));
    }

    #[test]
    fn endpoints_keep_the_base_path_with_or_without_trailing_slash() {
        for base_url in ["http://bank.example/api/v1", "http://bank.example/api/v1/"] {
            let client = HttpStatementApi::new(base_url).expect("could not create client");

            let url = client.endpoint(&["account"]).expect("could not build URL");

            assert_eq!(url.as_str(), "http://bank.example/api/v1/account");
        }
    }

    #[test]
    fn ids_cannot_escape_the_base_path() {
        let client =
            HttpStatementApi::new("http://bank.example/api/v1").expect("could not create client");

        let url = client
            .endpoint(&["account", "../../admin", "statement"])
            .expect("could not build URL");
        assert_eq!(
            url.as_str(),
            "http://bank.example/api/v1/account/..%2F..%2Fadmin/statement"
        );

        let url = client
            .endpoint(&["account", "transaction", "x?accountId=other#top"])
            .expect("could not build URL");
        assert_eq!(
            url.as_str(),
            "http://bank.example/api/v1/account/transaction/x%3FaccountId=other%23top"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[tokio::test]
    async fn account_id_with_slash_is_sent_as_one_segment() {
        let (client, _) = start_fake_api().await;

        let transactions = client
            .list_transactions(TOKEN, "acc/1")
            .await
            .expect("could not list transactions");

        assert_eq!(transactions[0].account_id, "acc/1");
    }
}
