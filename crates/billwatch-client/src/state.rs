use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};

use crate::{ClientError, ClientResult};

const DB_FILE_NAME: &str = "ledger.db";

/// Where the ledger lives on disk. Resolution order: an explicit
/// override, the `BILLWATCH_HOME` environment variable, then
/// `~/.billwatch`. The resolved root is always absolute so error
/// messages and lock diagnostics name a stable location.
#[derive(Debug, Clone)]
pub struct LedgerHome {
    root: PathBuf,
}

impl LedgerHome {
    pub fn resolve(override_path: Option<&Path>) -> ClientResult<Self> {
        let candidate = override_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("BILLWATCH_HOME").map(PathBuf::from))
            .or_else(|| home::home_dir().map(|dir| dir.join(".billwatch")))
            .ok_or_else(|| {
                ClientError::ledger_init_failed(
                    Path::new("."),
                    "Could not resolve a home directory for ledger initialization.",
                )
            })?;

        let root = if candidate.is_absolute() {
            candidate
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&candidate))
                .map_err(|error| ClientError::ledger_init_failed(&candidate, &error.to_string()))?
        };

        Ok(Self { root })
    }

    /// Creates the ledger directory, private to the owner where the
    /// platform supports it.
    pub fn ensure_exists(&self) -> ClientResult<()> {
        fs::create_dir_all(&self.root).map_err(|error| {
            if error.kind() == std::io::ErrorKind::PermissionDenied {
                ClientError::ledger_init_permission_denied(&self.root, &error.to_string())
            } else {
                ClientError::ledger_init_failed(&self.root, &error.to_string())
            }
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.root, fs::Permissions::from_mode(0o700));
        }

        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE_NAME)
    }
}

/// The one connection path for setup, import, and queries. Read-write,
/// with a short busy timeout so concurrent CLI runs surface as
/// `ledger_locked` instead of hanging.
pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    let connection =
        Connection::open(db_path).map_err(|error| map_sqlite_error(db_path, &error))?;
    connection
        .busy_timeout(Duration::from_millis(250))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(connection)
}

/// Classifies SQLite failures into the ledger error taxonomy.
pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ClientError::ledger_locked(path)
        }
        Some(ErrorCode::NotADatabase) => ClientError::ledger_corrupt(path),
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}
