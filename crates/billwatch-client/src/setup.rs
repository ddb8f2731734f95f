use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};

use crate::contracts::types::DataRange;
use crate::migrations::{TRANSACTIONS_COLUMNS, TRANSACTIONS_TABLE, run_pending};
use crate::state::{LedgerHome, map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub db_path: PathBuf,
    pub data_range: DataRange,
}

pub fn ensure_initialized() -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(None)
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(Some(home_override))
}

fn ensure_initialized_with_home_override(
    home_override: Option<&Path>,
) -> ClientResult<SetupContext> {
    let ledger_home = LedgerHome::resolve(home_override)?;
    ledger_home.ensure_exists()?;

    let db_path = ledger_home.db_path();
    let mut connection = open_connection(&db_path)?;

    run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;
    verify_transactions_table(&connection, &db_path)?;

    let data_range = read_data_range(&connection, &db_path)?;

    Ok(SetupContext {
        db_path,
        data_range,
    })
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    match error {
        rusqlite_migration::Error::RusqliteError { query: _, err } => {
            let mapped = map_sqlite_error(db_path, err);
            if mapped.code == "ledger_locked"
                || mapped.code == "ledger_corrupt"
                || mapped.code == "ledger_init_permission_denied"
            {
                mapped
            } else {
                ClientError::migration_failed(db_path, &error.to_string())
            }
        }
        _ => ClientError::migration_failed(db_path, &error.to_string()),
    }
}

fn verify_transactions_table(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let exists = connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
            params![TRANSACTIONS_TABLE],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);
    if !exists {
        return Err(ClientError::ledger_corrupt(db_path));
    }

    let columns = table_columns(connection, db_path)?;
    for required_column in TRANSACTIONS_COLUMNS {
        if !columns.iter().any(|column| column == required_column) {
            return Err(ClientError::ledger_corrupt(db_path));
        }
    }

    Ok(())
}

fn table_columns(connection: &Connection, db_path: &Path) -> ClientResult<Vec<String>> {
    let mut statement = connection
        .prepare("PRAGMA table_info(transactions)")
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let column_iter = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut columns: Vec<String> = Vec::new();
    for row in column_iter {
        let column = row.map_err(|error| map_sqlite_error(db_path, &error))?;
        columns.push(column);
    }

    Ok(columns)
}

/// Re-reads the posted_at range after writes without re-running setup.
pub(crate) fn ledger_data_range(db_path: &Path) -> ClientResult<DataRange> {
    let connection = open_connection(db_path)?;
    read_data_range(&connection, db_path)
}

fn read_data_range(connection: &Connection, db_path: &Path) -> ClientResult<DataRange> {
    let mut statement = connection
        .prepare("SELECT MIN(posted_at), MAX(posted_at) FROM transactions")
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let row = statement
        .query_row([], |result_row| {
            let earliest = result_row.get::<_, Option<String>>(0)?;
            let latest = result_row.get::<_, Option<String>>(1)?;
            Ok(DataRange { earliest, latest })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(row)
}
