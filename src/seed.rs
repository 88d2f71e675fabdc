//! One-time seeding of the database from the upstream transaction dataset.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{NewTransaction, count_transactions, insert_transactions},
};

/// The dataset the service seeds itself from when no override is given.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A product transaction as it appears in the upstream JSON dataset.
///
/// The upstream records carry extra fields such as an image URL, which are
/// ignored. Sale timestamps are RFC 3339 date-times, only the calendar date
/// is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTransaction {
    /// The name of the product that was listed for sale.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold or listed.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product actually sold.
    pub sold: bool,
}

impl From<SeedTransaction> for NewTransaction {
    fn from(record: SeedTransaction) -> Self {
        Self {
            title: record.title,
            description: record.description,
            price: record.price,
            date_of_sale: record.date_of_sale.date(),
            category: record.category,
            sold: record.sold,
        }
    }
}

/// Download and decode the seed dataset from `url`.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the request fails, the server responds
/// with an error status, or the body is not valid JSON for the expected
/// record shape.
pub async fn fetch_seed_transactions(url: &str) -> Result<Vec<SeedTransaction>, Error> {
    let seed_fetch_error = |reason: String| Error::SeedFetchError {
        url: url.to_owned(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|error| seed_fetch_error(error.to_string()))?;

    client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| seed_fetch_error(error.to_string()))?
        .json()
        .await
        .map_err(|error| seed_fetch_error(error.to_string()))
}

/// Seed the database from the dataset at `url` unless it already holds
/// transactions, and return the number of inserted rows.
///
/// Re-running the server against an existing database skips the download
/// entirely and returns zero.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the dataset cannot be fetched or
/// decoded, or [Error::SqlError] if the rows cannot be inserted.
pub async fn ensure_seed_data(
    db_connection: &Arc<Mutex<Connection>>,
    url: &str,
) -> Result<usize, Error> {
    {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        let existing_count = count_transactions(&connection)?;

        if existing_count > 0 {
            tracing::info!("Skipping seeding, the database holds {existing_count} transactions.");
            return Ok(0);
        }
    }

    let seed_records = fetch_seed_transactions(url).await?;
    let new_transactions = seed_records.into_iter().map(NewTransaction::from).collect();

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let inserted_count = insert_transactions(new_transactions, &connection)?;
    tracing::info!("Seeded the database with {inserted_count} transactions.");

    Ok(inserted_count)
}

#[cfg(test)]
mod seed_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{NewTransaction, count_transactions, create_transaction},
    };

    use super::{SeedTransaction, ensure_seed_data};

    const UPSTREAM_SAMPLE: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven Foldsack No 1 Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }
    ]"#;

    #[test]
    fn parses_upstream_records_and_ignores_extra_fields() {
        let records: Vec<SeedTransaction> =
            serde_json::from_str(UPSTREAM_SAMPLE).expect("Could not parse seed records");

        assert_eq!(1, records.len());
        assert_eq!("Fjallraven Foldsack No 1 Backpack", records[0].title);
        assert_eq!(329.85, records[0].price);
        assert_eq!("men's clothing", records[0].category);
        assert!(!records[0].sold);
    }

    #[test]
    fn converts_records_keeping_the_calendar_date() {
        let records: Vec<SeedTransaction> =
            serde_json::from_str(UPSTREAM_SAMPLE).expect("Could not parse seed records");

        let new_transaction = NewTransaction::from(records[0].clone());

        assert_eq!(date!(2021 - 11 - 27), new_transaction.date_of_sale);
    }

    #[tokio::test]
    async fn skips_seeding_when_database_is_not_empty() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_transaction(
            NewTransaction {
                title: "Existing".to_owned(),
                description: String::new(),
                price: 1.0,
                date_of_sale: date!(2022 - 03 - 01),
                category: "electronics".to_owned(),
                sold: true,
            },
            &conn,
        )
        .expect("Could not create transaction");
        let db_connection = Arc::new(Mutex::new(conn));

        // The URL is never fetched because the row count check comes first.
        let inserted_count = ensure_seed_data(&db_connection, "http://192.0.2.0/unreachable")
            .await
            .expect("Seeding should be skipped without error");

        assert_eq!(0, inserted_count);
        let connection = db_connection.lock().unwrap();
        assert_eq!(1, count_transactions(&connection).unwrap());
    }
}
