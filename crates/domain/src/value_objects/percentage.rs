//! Display formatting for percentages.
//!
//! Percentage changes use adaptive precision so that very small moves stay
//! visible instead of rounding to zero. Swap fees and APRs use fixed rules.

use super::{Metric, NOT_AVAILABLE};
use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places used for a percentage change of the given size.
///
/// | `abs(pct)`          | places |
/// |---------------------|--------|
/// | `< 0.01`            | 4      |
/// | `0.01 <= x < 1.0`   | 3      |
/// | `>= 1.0`            | 2      |
#[must_use]
pub fn change_precision(pct: Decimal) -> u32 {
    let magnitude = pct.abs();
    if magnitude < Decimal::new(1, 2) {
        4
    } else if magnitude < Decimal::ONE {
        3
    } else {
        2
    }
}

/// Formats a signed percentage change, e.g. `+11.11%`, `-0.250%`, `+0.0000%`.
///
/// The sign is always explicit and follows the unrounded input, so a tiny
/// negative move renders as `-0.0000%` rather than `+0.0000%`.
///
/// The precision tier is also picked from the unrounded input: `0.99996`
/// falls in the three-place tier and renders as `+1.000%`, not `+1.00%`.
#[must_use]
pub fn format_change(pct: Decimal) -> String {
    let sign = if pct.is_sign_negative() && !pct.is_zero() {
        '-'
    } else {
        '+'
    };
    let places = change_precision(pct);
    format!("{sign}{}%", fixed(pct.abs(), places))
}

/// Formats a change or passes the "N/A" marker through untouched.
#[must_use]
pub fn format_change_metric(change: &Metric<Decimal>) -> String {
    match change {
        Metric::Value(pct) => format_change(*pct),
        Metric::NotAvailable(_) => NOT_AVAILABLE.to_string(),
    }
}

/// Formats a swap fee given as a percentage: up to four places, trailing
/// zeros trimmed (`0.3000` -> `0.3%`, `0.0001` -> `0.0001%`).
#[must_use]
pub fn format_swap_fee_pct(pct: Decimal) -> String {
    let rounded = pct
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{rounded}%")
}

/// Formats a swap fee stored as a fraction (`0.003` -> `0.3%`).
#[must_use]
pub fn format_swap_fee(fraction: Decimal) -> String {
    match fraction.checked_mul(HUNDRED) {
        Some(pct) => format_swap_fee_pct(pct),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Formats an APR stored as a fraction with two places (`0.01095` -> `1.10%`).
#[must_use]
pub fn format_apr(fraction: Decimal) -> String {
    match fraction.checked_mul(HUNDRED) {
        Some(pct) => format!("{}%", fixed(pct, 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Formats an optional APR, rendering "N/A" when unavailable.
#[must_use]
pub fn format_apr_metric(apr: &Metric<Decimal>) -> String {
    match apr {
        Metric::Value(fraction) => format_apr(*fraction),
        Metric::NotAvailable(_) => NOT_AVAILABLE.to_string(),
    }
}

/// Formats a share of a total (weights, "percentage of total volume") with
/// one place, e.g. `80.0%`.
#[must_use]
pub fn format_share(pct: Decimal) -> String {
    format!("{}%", fixed(pct, 1))
}

/// Renders `value` with exactly `places` decimals, rounding half away from zero.
fn fixed(value: Decimal, places: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded.to_string()
}
