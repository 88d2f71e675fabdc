//! Product transactions for the sales statistics service.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` for creating transactions
//! - Database functions for storing, counting, and querying transactions
//! - The endpoint for listing and searching the transactions of a month

mod core;
mod list_endpoint;
mod query;

pub use core::{
    NewTransaction, Transaction, TransactionId, count_transactions, create_transaction,
    create_transaction_table, insert_transactions,
};
pub use list_endpoint::{ListTransactionsState, list_transactions_endpoint};
pub use query::{TransactionQuery, get_transactions};
