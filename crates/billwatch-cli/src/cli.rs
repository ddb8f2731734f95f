use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

/// Extended help shown after `billwatch import --help`.
/// Contains workflow guidance, schema, and next-step instructions.
pub const IMPORT_AFTER_HELP: &str = "\
How import works:
  Billwatch does not parse raw bank PDFs or provider-specific exports.
  You parse each statement into a normalized file, then import it.

  Accepted formats:
    JSON — one top-level array of transaction objects
    CSV  — one header row with schema field names

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat rows.json | billwatch import --dry-run -

What to do next:
  1. Parse your source into normalized JSON or schema-matching CSV.
  2. Run `billwatch import --dry-run <path>` and fix any reported issues.
  3. Run `billwatch import <path>` once dry-run passes.

Import schema:
  JSON example (one top-level array):
  [
    {
      \"account_id\": \"chase_checking_1234\",
      \"posted_at\": \"2026-01-15\",
      \"amount\": -42.15,
      \"description\": \"WHOLE FOODS\",
      \"merchant\": \"Whole Foods\"
    }
  ]

  CSV example (header + rows):
  account_id,posted_at,amount,description,merchant
  chase_checking_1234,2026-01-15,-42.15,WHOLE FOODS,Whole Foods

Field rules:
  account_id (required):
    A stable account name. Pick one value and keep it the same forever.
    Example: `chase_checking_1234`

  posted_at (required):
    A date `YYYY-MM-DD`, or a timestamp `YYYY-MM-DDTHH:MM:SS`.

  amount (required):
    A number, not text.
    Signed amount rules (strict):
    - negative = money out (`spend`, `card charge`)
    - positive = money in (`refund`, `payment`, `credit`)
    Only negative amounts feed recurring detection.

  description (required):
    Raw transaction text from the source.

  merchant (optional):
    Clean merchant name if you know it. Detection prefers it for labels.

  icon_url, category_color, category_icon_lib, category_icon_name (optional):
    Display decoration carried through to recurring output unchanged.
";

#[derive(Debug, Parser)]
#[command(
    name = "billwatch",
    version,
    about = "recurring payment watcher for your transaction ledger",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import normalized transaction data into your local Billwatch ledger
    #[command(after_long_help = IMPORT_AFTER_HELP)]
    Import {
        /// Validate import data without writing to the ledger
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to a normalized JSON or CSV file (use `-` for stdin)
        path: String,
    },
    /// Detect recurring payment patterns in your imported data
    Recurring {
        /// Detection clock override (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<IsoDate>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
