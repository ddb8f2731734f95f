use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");

pub const TRANSACTIONS_TABLE: &str = "transactions";

pub const TRANSACTIONS_COLUMNS: [&str; 11] = [
    "txn_id",
    "account_id",
    "posted_at",
    "amount",
    "description",
    "merchant",
    "icon_url",
    "category_color",
    "category_icon_lib",
    "category_icon_name",
    "created_at",
];

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    let migrations = Migrations::new(vec![M::up(BOOTSTRAP_SQL)]);
    migrations.to_latest(conn)
}
