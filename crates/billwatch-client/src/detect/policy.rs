/// Deterministic detection policy identifier, emitted with recurring
/// results so future threshold changes stay auditable.
pub const DETECTION_POLICY_VERSION: &str = "recurring/v1";

/// v1 recurring-payment detection thresholds.
///
/// The gap-median band and the amount-stability floor are frozen for v1;
/// widening either changes which series qualify at the boundary and
/// should only happen under a new policy version.
#[derive(Debug, Clone, Copy)]
pub struct DetectionPolicy {
    pub lookback_days: i64,
    pub min_occurrences: usize,
    pub monthly_gap_min: i64,
    pub monthly_gap_max: i64,
    pub amount_tolerance_ratio: f64,
    pub stable_member_ratio: f64,
    pub stable_member_floor: usize,
    pub step_floor_days: i64,
    pub step_ceiling_days: i64,
    pub max_results: usize,
}

impl DetectionPolicy {
    pub fn is_monthly_gap(self, gap_median: i64) -> bool {
        gap_median >= self.monthly_gap_min && gap_median <= self.monthly_gap_max
    }

    /// Days added per predicted occurrence, the gap median clamped into
    /// the calendar-month range.
    pub fn step_days(self, gap_median: i64) -> i64 {
        gap_median.clamp(self.step_floor_days, self.step_ceiling_days)
    }

    /// Minimum number of members that must sit inside the amount band:
    /// `max(floor, ceil(ratio * member_count))`.
    pub fn required_stable_members(self, member_count: usize) -> usize {
        let scaled = (self.stable_member_ratio * member_count as f64).ceil() as usize;
        scaled.max(self.stable_member_floor)
    }

    pub fn within_amount_band(self, abs_amount: f64, mean: f64) -> bool {
        if mean <= 0.0 {
            return false;
        }
        (abs_amount - mean).abs() / mean <= self.amount_tolerance_ratio
    }
}

pub const DETECTION_POLICY_V1: DetectionPolicy = DetectionPolicy {
    lookback_days: 130,
    min_occurrences: 3,
    monthly_gap_min: 27,
    monthly_gap_max: 33,
    amount_tolerance_ratio: 0.20,
    stable_member_ratio: 0.6,
    stable_member_floor: 3,
    step_floor_days: 28,
    step_ceiling_days: 31,
    max_results: 10,
};
