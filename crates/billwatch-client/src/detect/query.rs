use std::path::Path;

use crate::ClientResult;
use crate::detect::dates::parse_transaction_datetime;
use crate::detect::types::Transaction;
use crate::state::{map_sqlite_error, open_connection};

/// Loads the full transaction history for detection. Rows with timestamps
/// that fail to parse are skipped rather than failing the run; the
/// detector re-sorts each series, so no ordering contract is required
/// here beyond determinism.
pub fn load_transactions(db_path: &Path) -> ClientResult<Vec<Transaction>> {
    let connection = open_connection(db_path)?;
    let mut statement = connection
        .prepare(
            "SELECT
                account_id,
                posted_at,
                amount,
                description,
                merchant,
                icon_url,
                category_color,
                category_icon_lib,
                category_icon_name
             FROM transactions
             ORDER BY account_id ASC, posted_at ASC, txn_id ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            let account_id: String = row.get(0)?;
            let posted_at: String = row.get(1)?;
            let amount: f64 = row.get(2)?;
            let description: String = row.get(3)?;
            let merchant: Option<String> = row.get(4)?;
            let icon_url: Option<String> = row.get(5)?;
            let category_color: Option<String> = row.get(6)?;
            let category_icon_lib: Option<String> = row.get(7)?;
            let category_icon_name: Option<String> = row.get(8)?;
            Ok((
                account_id,
                posted_at,
                amount,
                description,
                merchant,
                icon_url,
                category_color,
                category_icon_lib,
                category_icon_name,
            ))
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut transactions: Vec<Transaction> = Vec::new();
    for row in rows_iter {
        let (
            account_id,
            posted_at,
            amount,
            description,
            merchant,
            icon_url,
            category_color,
            category_icon_lib,
            category_icon_name,
        ) = row.map_err(|error| map_sqlite_error(db_path, &error))?;

        let Some(parsed_posted_at) = parse_transaction_datetime(&posted_at) else {
            continue;
        };

        transactions.push(Transaction {
            account_id,
            posted_at: parsed_posted_at,
            amount,
            description: description.trim().to_string(),
            merchant: merchant
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            icon_url,
            category_color,
            category_icon_lib,
            category_icon_name,
        });
    }

    Ok(transactions)
}
