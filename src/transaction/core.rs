//! Defines the core data model and database queries for product transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// Alias for the integer type used for transaction row IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A product sale record as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The name of the product that was listed for sale.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The date the product was sold or listed.
    pub date_of_sale: Date,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product actually sold.
    pub sold: bool,
}

/// The fields of a [Transaction] before it has been assigned a database ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The name of the product that was listed for sale.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The date the product was sold or listed.
    pub date_of_sale: Date,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product actually sold.
    pub sold: bool,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (title, description, price, date_of_sale, category, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, title, description, price, date_of_sale, category, sold",
        )?
        .query_one(
            (
                new_transaction.title,
                new_transaction.description,
                new_transaction.price,
                new_transaction.date_of_sale,
                new_transaction.category,
                new_transaction.sold,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Insert `new_transactions` into the database in a single SQL transaction.
///
/// Returns the number of inserted rows. Rows are inserted in the order given
/// so the assigned IDs follow the order of the seed dataset.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
/// No rows are inserted if any insert fails.
pub fn insert_transactions(
    new_transactions: Vec<NewTransaction>,
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO transactions (title, description, price, date_of_sale, category, sold)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    let mut inserted_count = 0;

    for new_transaction in new_transactions {
        stmt.execute((
            new_transaction.title,
            new_transaction.description,
            new_transaction.price,
            new_transaction.date_of_sale,
            new_transaction.category,
            new_transaction.sold,
        ))?;

        inserted_count += 1;
    }

    drop(stmt);

    tx.commit()?;
    Ok(inserted_count)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale TEXT NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transactions', 0)",
        (),
    )?;

    // Month lookups extract the month from the sale date, so index the
    // extracted month rather than the raw date text.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_sale_month
         ON transactions (CAST(strftime('%m', date_of_sale) AS INTEGER));",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let date_of_sale = row.get(4)?;
    let category = row.get(5)?;
    let sold = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        description,
        price,
        date_of_sale,
        category,
        sold,
    })
}

// ============================================================================
// TESTS
// ============================================================================
