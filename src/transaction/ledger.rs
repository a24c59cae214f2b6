//! The local copy of each account's statement.
//!
//! The ledger mirrors what the banking API last returned for an account. It is
//! replaced wholesale whenever the statement page is loaded and patched in
//! place after each successful update or delete, so the page can be
//! re-rendered without fetching the statement again.
//!
//! Ledgers are keyed by the caller's token as well as the account, so a
//! ledger is only visible to the token the API served it to.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use sha2::{Digest, Sha256, digest::Output};
use time::Date;

use crate::{
    Error,
    auth::BearerToken,
    transaction::core::{AccountId, Transaction, TransactionId, TransactionType},
};

/// The ordered list of transactions displayed for one account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

/// The fields of a transaction that an update may change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPatch {
    pub type_: TransactionType,
    pub value: f64,
    pub date: Option<Date>,
    pub attachment: Option<String>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    /// Apply `patch` to the transaction with `id`, keeping its position.
    ///
    /// Returns the updated transaction, or `None` if no transaction has `id`.
    pub fn replace(&mut self, id: &str, patch: TransactionPatch) -> Option<&Transaction> {
        let transaction = self
            .transactions
            .iter_mut()
            .find(|transaction| transaction.id == id)?;

        transaction.type_ = patch.type_;
        transaction.value = patch.value;

        if let Some(date) = patch.date {
            transaction.date = date;
        }

        if patch.attachment.is_some() {
            transaction.attachment = patch.attachment;
        }

        Some(&*transaction)
    }

    /// Remove the transaction with `id`.
    ///
    /// Returns the removed transaction, or `None` if no transaction has `id`.
    pub fn remove(&mut self, id: &str) -> Option<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)?;

        Some(self.transactions.remove(index))
    }
}

/// Identifies the ledger one token fetched for one account.
///
/// Only a digest of the token is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    owner: Output<Sha256>,
    account_id: AccountId,
}

impl LedgerKey {
    pub fn new(token: &BearerToken, account_id: &str) -> Self {
        Self {
            owner: Sha256::digest(token.as_str().as_bytes()),
            account_id: account_id.to_owned(),
        }
    }
}

/// The ledgers of every account that has been viewed since the server started.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    ledgers: Arc<Mutex<HashMap<LedgerKey, Ledger>>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ledger for `key` with freshly fetched `transactions`.
    ///
    /// # Errors
    /// Returns [Error::LedgerLockError] if the lock is poisoned.
    pub fn set(&self, key: &LedgerKey, transactions: Vec<Transaction>) -> Result<Ledger, Error> {
        let ledger = Ledger::new(transactions);
        self.lock()?.insert(key.clone(), ledger.clone());

        Ok(ledger)
    }

    /// Get a copy of the ledger for `key`.
    ///
    /// # Errors
    /// Returns [Error::LedgerNotLoaded] if this token has not fetched the
    /// account's statement yet, or [Error::LedgerLockError] if the lock is
    /// poisoned.
    pub fn get(&self, key: &LedgerKey) -> Result<Ledger, Error> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or(Error::LedgerNotLoaded)
    }

    /// Get a copy of a single transaction.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if the account's ledger does not
    /// contain the transaction.
    pub fn get_transaction(
        &self,
        key: &LedgerKey,
        transaction_id: &str,
    ) -> Result<Transaction, Error> {
        self.get(key)?
            .get(transaction_id)
            .cloned()
            .ok_or(Error::TransactionNotFound)
    }

    /// Apply `patch` to a transaction and return the updated ledger.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if the transaction is not in the
    /// account's ledger.
    pub fn replace(
        &self,
        key: &LedgerKey,
        transaction_id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Ledger, Error> {
        let mut ledgers = self.lock()?;
        let ledger = ledgers.get_mut(key).ok_or(Error::LedgerNotLoaded)?;

        ledger
            .replace(transaction_id, patch)
            .ok_or(Error::TransactionNotFound)?;

        Ok(ledger.clone())
    }

    /// Remove a transaction and return the updated ledger.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if the transaction is not in the
    /// account's ledger.
    pub fn remove(&self, key: &LedgerKey, transaction_id: &str) -> Result<Ledger, Error> {
        let mut ledgers = self.lock()?;
        let ledger = ledgers.get_mut(key).ok_or(Error::LedgerNotLoaded)?;

        ledger
            .remove(transaction_id)
            .ok_or(Error::TransactionNotFound)?;

        Ok(ledger.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<LedgerKey, Ledger>>, Error> {
        self.ledgers.lock().map_err(|error| {
            tracing::error!("could not acquire the ledger lock: {error}");
            Error::LedgerLockError
        })
    }
}
