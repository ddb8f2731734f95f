use std::path::Path;

use chrono::Local;
use rusqlite::{TransactionBehavior, params};
use ulid::Ulid;

use crate::ClientResult;
use crate::detect::dates::format_iso_datetime;
use crate::import::CanonicalTransaction;
use crate::state::{map_sqlite_error, open_connection};

#[derive(Debug, Clone)]
pub(crate) struct PersistResult {
    pub(crate) import_id: String,
    pub(crate) inserted: i64,
}

pub(crate) fn persist_rows(
    db_path: &Path,
    rows: &[CanonicalTransaction],
) -> ClientResult<PersistResult> {
    let import_id = format!("imp_{}", Ulid::new());
    let timestamp = now_timestamp();

    let mut connection = open_connection(db_path)?;
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut inserted = 0_i64;
    for row in rows {
        let txn_id = format!("txn_{}", Ulid::new());
        transaction
            .execute(
                "INSERT INTO transactions (
                    txn_id,
                    account_id,
                    posted_at,
                    amount,
                    description,
                    merchant,
                    icon_url,
                    category_color,
                    category_icon_lib,
                    category_icon_name,
                    created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    &txn_id,
                    &row.account_id,
                    &row.posted_at,
                    row.amount,
                    &row.description,
                    &row.merchant,
                    &row.icon_url,
                    &row.category_color,
                    &row.category_icon_lib,
                    &row.category_icon_name,
                    &timestamp
                ],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
        inserted += 1;
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(PersistResult {
        import_id,
        inserted,
    })
}

// created_at uses the same canonical ISO form as stored posted_at.
fn now_timestamp() -> String {
    format_iso_datetime(&Local::now().naive_local())
}
