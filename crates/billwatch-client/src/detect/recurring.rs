use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::detect::dates::{day_gap, gap_median, next_due_on_or_after};
use crate::detect::normalize::{NormalizedKey, is_blocklisted, normalized_label};
use crate::detect::policy::{DETECTION_POLICY_V1, DetectionPolicy};
use crate::detect::types::{Cadence, RecurringPayment, Transaction};

#[derive(Debug, Clone)]
struct CandidateSeries {
    key: NormalizedKey,
    members: Vec<Transaction>,
}

/// Infers recurring (subscription/bill-like) charges from raw expense
/// history. Pure function of its inputs: the same transactions and the
/// same `now` always produce the same ranked list. Unqualifying data is
/// an empty result, never an error.
pub fn detect_recurring_payments(
    transactions: &[Transaction],
    now: NaiveDateTime,
) -> Vec<RecurringPayment> {
    detect_with_policy(transactions, now, DETECTION_POLICY_V1)
}

fn detect_with_policy(
    transactions: &[Transaction],
    now: NaiveDateTime,
    policy: DetectionPolicy,
) -> Vec<RecurringPayment> {
    let window_start = now - Duration::days(policy.lookback_days);

    let mut series: BTreeMap<String, CandidateSeries> = BTreeMap::new();
    for transaction in transactions {
        if !transaction.is_expense() || transaction.posted_at < window_start {
            continue;
        }
        let raw_label = transaction.display_label();
        if is_blocklisted(raw_label) {
            continue;
        }
        let Some(label) = normalized_label(raw_label) else {
            continue;
        };

        let key = NormalizedKey {
            account_id: transaction.account_id.clone(),
            label,
        };
        let grouping_key = key.grouping_key();
        let entry = series
            .entry(grouping_key)
            .or_insert_with(|| CandidateSeries {
                key,
                members: Vec::new(),
            });
        entry.members.push(transaction.clone());
    }

    let mut payments: Vec<RecurringPayment> = Vec::new();
    for candidate in series.values_mut() {
        if candidate.members.len() < policy.min_occurrences {
            continue;
        }

        // Explicit chronological sort; grouping order is never relied on.
        candidate.members.sort_by(|left, right| {
            left.posted_at
                .cmp(&right.posted_at)
                .then_with(|| left.amount.total_cmp(&right.amount))
                .then_with(|| left.description.cmp(&right.description))
        });

        let gaps = candidate
            .members
            .windows(2)
            .map(|pair| day_gap(pair[0].posted_at, pair[1].posted_at))
            .collect::<Vec<i64>>();
        let Some(median) = gap_median(&gaps) else {
            continue;
        };
        if !policy.is_monthly_gap(median) {
            continue;
        }

        let mean = mean_abs_amount(&candidate.members);
        let stable_members = candidate
            .members
            .iter()
            .filter(|member| policy.within_amount_band(member.abs_amount(), mean))
            .count();
        if stable_members < policy.required_stable_members(candidate.members.len()) {
            continue;
        }

        let Some(last) = candidate.members.last() else {
            continue;
        };
        let next_date = next_due_on_or_after(last.posted_at, policy.step_days(median), now);

        payments.push(RecurringPayment {
            key: candidate.key.grouping_key(),
            account_id: candidate.key.account_id.clone(),
            label: last.display_label().to_string(),
            cadence: Cadence::Monthly,
            average_amount: mean.round() as i64,
            last_date: last.posted_at,
            next_date,
            icon_url: last.icon_url.clone(),
            category_color: last.category_color.clone(),
            category_icon_lib: last.category_icon_lib.clone(),
            category_icon_name: last.category_icon_name.clone(),
        });
    }

    payments.sort_by(|left, right| {
        left.next_date
            .cmp(&right.next_date)
            .then_with(|| left.label.cmp(&right.label))
            .then_with(|| left.key.cmp(&right.key))
    });
    payments.truncate(policy.max_results);
    payments
}

fn mean_abs_amount(members: &[Transaction]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total: f64 = members.iter().map(Transaction::abs_amount).sum();
    total / members.len() as f64
}
