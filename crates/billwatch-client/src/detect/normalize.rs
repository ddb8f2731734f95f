use std::sync::LazyLock;

use regex::Regex;

/// Labels matching these are non-recurring by nature (fees, transfers,
/// peer-to-peer payments, reversals) and would pollute detection.
static NOISE_BLOCKLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(nsf|fee|overdraft|charge|atm|interest|transfer|zelle|venmo|cash app|apple cash|refund|reversal)\b",
    )
    .unwrap()
});

/// ACH / payment-processor boilerplate stripped from labels before
/// grouping. Punctuated tokens (`des:`, `id:`, `conf#`) match as
/// prefixes; bare tokens match whole words only. Multi-word and
/// punctuated alternatives come first so they win over their bare
/// substrings.
static PROCESSOR_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:ach hold|co id:|des:|indn:|conf#|id:|(?:ach|ppd|conf|trx|visa|debit|credit|pos|msp)\b)",
    )
    .unwrap()
});

/// Deduplication key tying a scrubbed label to its owning account.
/// Recomputed on every detection run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedKey {
    pub account_id: String,
    pub label: String,
}

impl NormalizedKey {
    pub fn grouping_key(&self) -> String {
        format!("{}|{}", self.account_id, self.label)
    }
}

pub fn is_blocklisted(label: &str) -> bool {
    NOISE_BLOCKLIST.is_match(label)
}

/// Scrubs a raw merchant/description label down to its stable core:
/// lowercase, processor boilerplate removed, digits removed, whitespace
/// collapsed. Returns `None` when what remains is shorter than 4
/// characters, which is too generic to key a series on.
pub fn normalized_label(raw_label: &str) -> Option<String> {
    let lowered = raw_label.to_lowercase();
    let stripped = PROCESSOR_TOKENS.replace_all(&lowered, " ");

    let without_digits: String = stripped
        .chars()
        .filter(|character| !character.is_ascii_digit())
        .collect();

    let collapsed = without_digits
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    if collapsed.chars().count() < 4 {
        return None;
    }
    Some(collapsed)
}
