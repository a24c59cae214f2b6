//! Transactions of a bank account and the statement that lists them.
//!
//! This module contains:
//! - The `Transaction` model exchanged with the banking API
//! - The local ledger that keeps each account's statement between requests
//! - The statement page, the edit and delete modals, and the endpoints behind them

mod attachment;
mod core;
mod delete_endpoint;
mod delete_page;
mod edit_endpoint;
mod edit_page;
mod form;
mod ledger;
mod statement_page;
mod view;

pub use attachment::get_transaction_attachment;
pub use core::{AccountId, Transaction, TransactionRequest, TransactionType};
pub use delete_endpoint::delete_transaction_endpoint;
pub use delete_page::get_delete_transaction_page;
pub use edit_endpoint::update_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use ledger::LedgerStore;
pub use statement_page::get_statement_page;
