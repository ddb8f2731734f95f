use chrono::NaiveDateTime;

/// One ledger transaction as seen by the detector. Negative amounts are
/// expenses; positive amounts are income or credits.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub account_id: String,
    pub posted_at: NaiveDateTime,
    pub amount: f64,
    pub description: String,
    pub merchant: Option<String>,
    pub icon_url: Option<String>,
    pub category_color: Option<String>,
    pub category_icon_lib: Option<String>,
    pub category_icon_name: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Raw display label, merchant name preferred over description.
    pub fn display_label(&self) -> &str {
        match &self.merchant {
            Some(merchant) if !merchant.trim().is_empty() => merchant,
            _ => &self.description,
        }
    }
}

/// Detected billing cadence.
///
/// Only a monthly cadence is classified. Weekly and biweekly charges fall
/// outside the gap-median band and are discarded; this is a known
/// limitation carried over deliberately rather than extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Monthly,
}

impl Cadence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
        }
    }
}

/// A predicted recurring charge. Built fresh on every detection run and
/// never persisted; callers own any caching.
#[derive(Debug, Clone)]
pub struct RecurringPayment {
    pub key: String,
    pub account_id: String,
    pub label: String,
    pub cadence: Cadence,
    pub average_amount: i64,
    pub last_date: NaiveDateTime,
    pub next_date: NaiveDateTime,
    pub icon_url: Option<String>,
    pub category_color: Option<String>,
    pub category_icon_lib: Option<String>,
    pub category_icon_name: Option<String>,
}
