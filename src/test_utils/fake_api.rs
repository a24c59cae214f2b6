//! An in-memory [StatementApi] that records the calls made against it.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Map;
use time::macros::date;

use crate::{
    account::Account,
    client::{ClientError, StatementApi},
    transaction::{Transaction, TransactionRequest, TransactionType},
};

/// An update the handlers asked the API to make.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UpdateCall {
    pub token: String,
    pub transaction_id: String,
    pub payload: TransactionRequest,
}

#[derive(Debug, Default)]
struct FakeState {
    account: Option<Account>,
    transactions: Vec<Transaction>,
    failure: Option<ClientError>,
    updates: Vec<UpdateCall>,
    deletes: Vec<(String, String)>,
    calls: usize,
}

type Hook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
    after_write: Mutex<Option<Hook>>,
}

impl FakeApi {
    pub(crate) fn with_account(account_id: &str) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().account = Some(Account {
            id: account_id.to_owned(),
            details: Map::new(),
        });

        api
    }

    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().transactions = transactions;

        api
    }

    /// Make every following call fail with `error`.
    pub(crate) fn fail_with(&self, error: ClientError) {
        self.state.lock().unwrap().failure = Some(error);
    }

    /// Run `hook` after every successful update or delete, before the
    /// handler sees the result.
    pub(crate) fn after_write(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.after_write.lock().unwrap() = Some(Box::new(hook));
    }

    pub(crate) fn update_calls(&self) -> Vec<UpdateCall> {
        self.state.lock().unwrap().updates.clone()
    }

    /// The `(account_id, transaction_id)` of each delete.
    pub(crate) fn delete_calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().deletes.clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn start_call(&self) -> Result<MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;

        if let Some(error) = state.failure.clone() {
            return Err(error);
        }

        Ok(state)
    }

    fn finish_write(&self) {
        if let Some(hook) = self.after_write.lock().unwrap().as_ref() {
            hook();
        }
    }
}

#[async_trait]
impl StatementApi for FakeApi {
    async fn list_transactions(
        &self,
        _token: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ClientError> {
        let state = self.start_call()?;

        Ok(state
            .transactions
            .iter()
            .filter(|transaction| transaction.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn update_transaction(
        &self,
        token: &str,
        transaction_id: &str,
        payload: &TransactionRequest,
    ) -> Result<(), ClientError> {
        {
            let mut state = self.start_call()?;
            state.updates.push(UpdateCall {
                token: token.to_owned(),
                transaction_id: transaction_id.to_owned(),
                payload: payload.clone(),
            });

            if let Some(transaction) = state
                .transactions
                .iter_mut()
                .find(|transaction| transaction.id == transaction_id)
            {
                transaction.type_ = payload.type_;
                transaction.value = payload.value;
            }
        }

        self.finish_write();

        Ok(())
    }

    async fn delete_transaction(
        &self,
        _token: &str,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<(), ClientError> {
        {
            let mut state = self.start_call()?;
            state
                .deletes
                .push((account_id.to_owned(), transaction_id.to_owned()));
            state
                .transactions
                .retain(|transaction| transaction.id != transaction_id);
        }

        self.finish_write();

        Ok(())
    }

    async fn get_account(&self, _token: &str) -> Result<Account, ClientError> {
        let state = self.start_call()?;

        state.account.clone().ok_or(ClientError::NotFound)
    }
}

/// A transaction on account `acc-1` dated 2024-05-01.
pub(crate) fn transaction(id: &str, type_: TransactionType, value: f64) -> Transaction {
    Transaction {
        id: id.to_owned(),
        type_,
        value,
        date: date!(2024 - 05 - 01),
        account_id: "acc-1".to_owned(),
        attachment: None,
    }
}
