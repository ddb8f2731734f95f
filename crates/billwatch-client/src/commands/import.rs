use std::io::Read;
use std::path::Path;

use crate::ClientResult;
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::ImportData;
use crate::error::ClientError;
use crate::import;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at, ledger_data_range};

#[derive(Debug, Default)]
pub struct ImportRunOptions<'a> {
    pub path: String,
    pub dry_run: bool,
    pub home_override: Option<&'a Path>,
}

pub fn run(path: String, dry_run: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ImportRunOptions {
        path,
        dry_run,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ImportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let content = read_source(&options.path)?;

    let outcome = import::run(&setup.db_path, &content, options.dry_run)?;

    let message = if options.dry_run {
        format!(
            "Dry run complete: {} rows validated. No rows were written.",
            outcome.summary.rows_valid
        )
    } else {
        format!("Imported {} transactions.", outcome.summary.inserted)
    };

    let data_range = if options.dry_run {
        setup.data_range
    } else {
        ledger_data_range(&setup.db_path)?
    };

    let data = ImportData {
        dry_run: options.dry_run,
        path: Some(options.path),
        import_id: outcome.import_id,
        message,
        summary: outcome.summary,
        issues: Vec::new(),
        data_range,
    };

    SuccessEnvelope::for_command("import", data)
}

fn read_source(path: &str) -> ClientResult<String> {
    if path == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|error| {
                ClientError::invalid_argument(&format!("Cannot read import data from stdin: {error}"))
            })?;
        return Ok(content);
    }

    std::fs::read_to_string(path).map_err(|error| {
        ClientError::invalid_argument_with_recovery(
            &format!("Cannot read import file `{path}`: {error}"),
            vec![
                "Check that the path exists and is readable.".to_string(),
                "Use `-` to read import data from stdin.".to_string(),
            ],
        )
    })
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}
