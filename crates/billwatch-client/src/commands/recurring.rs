use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::ClientResult;
use crate::contracts::envelope::SuccessEnvelope;
use crate::contracts::types::{RecurringData, RecurringRow};
use crate::detect::dates::format_iso_datetime;
use crate::detect::policy::DETECTION_POLICY_VERSION;
use crate::detect::query::load_transactions;
use crate::detect::recurring::detect_recurring_payments;
use crate::error::ClientError;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

#[derive(Debug, Default)]
pub struct RecurringRunOptions<'a> {
    pub as_of: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(as_of: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(RecurringRunOptions {
        as_of: as_of.map(std::string::ToString::to_string),
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: RecurringRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let now = resolve_as_of(options.as_of.as_deref())?;

    let transactions = load_transactions(&setup.db_path)?;
    let recurring = detect_recurring_payments(&transactions, now);

    let rows = recurring
        .iter()
        .map(|payment| RecurringRow {
            key: payment.key.clone(),
            account_id: payment.account_id.clone(),
            label: payment.label.clone(),
            cadence: payment.cadence.as_str().to_string(),
            average_amount: payment.average_amount,
            last_date: format_iso_datetime(&payment.last_date),
            next_date: format_iso_datetime(&payment.next_date),
            icon_url: payment.icon_url.clone(),
            category_color: payment.category_color.clone(),
            category_icon_lib: payment.category_icon_lib.clone(),
            category_icon_name: payment.category_icon_name.clone(),
        })
        .collect::<Vec<RecurringRow>>();

    let data = RecurringData {
        policy_version: DETECTION_POLICY_VERSION.to_string(),
        as_of: format_iso_datetime(&now),
        rows,
        data_range: setup.data_range,
    };

    SuccessEnvelope::for_command("recurring", data)
}

/// The detection clock is injectable so runs are reproducible; without
/// `--as-of` it is the local wall-clock.
fn resolve_as_of(as_of: Option<&str>) -> ClientResult<NaiveDateTime> {
    let Some(value) = as_of else {
        return Ok(Local::now().naive_local());
    };

    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0));
    parsed.ok_or_else(|| {
        ClientError::invalid_argument_for_command(
            "`as-of` must use YYYY-MM-DD format with a real calendar date.",
            Some("recurring"),
        )
    })
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}
