//! Period-over-period deltas.

use crate::enums::DataCompleteness;
use crate::value_objects::{Metric, Unavailable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value compared against its historical counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub current: Option<Decimal>,
    pub historical: Option<Decimal>,
    /// `current - historical`.
    pub delta: Metric<Decimal>,
    /// `delta / historical * 100`.
    pub pct_change: Metric<Decimal>,
}

/// Percentage change from `historical` to `current`.
///
/// Both zero is "no change" (0). A zero baseline with a non-zero current
/// value has no defined percentage and yields the "N/A" marker.
#[must_use]
pub fn pct_change(current: Decimal, historical: Decimal) -> Metric<Decimal> {
    if historical.is_zero() {
        return if current.is_zero() {
            Metric::Value(Decimal::ZERO)
        } else {
            Metric::NotAvailable(Unavailable::UndefinedRatio)
        };
    }
    current
        .checked_sub(historical)
        .and_then(|delta| delta.checked_div(historical))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(
            Metric::NotAvailable(Unavailable::UndefinedRatio),
            Metric::Value,
        )
}

/// Compares two optional values.
///
/// An estimated window has no real baseline, so the delta and percentage are
/// both "N/A" and only the current value is carried.
#[must_use]
pub fn compare_values(
    current: Option<Decimal>,
    historical: Option<Decimal>,
    completeness: DataCompleteness,
) -> Change {
    if !completeness.is_complete() {
        return Change {
            current,
            historical: None,
            delta: Metric::NotAvailable(Unavailable::Estimated),
            pct_change: Metric::NotAvailable(Unavailable::Estimated),
        };
    }

    let (Some(cur), Some(hist)) = (current, historical) else {
        return Change {
            current,
            historical,
            delta: Metric::MISSING,
            pct_change: Metric::MISSING,
        };
    };

    Change {
        current,
        historical,
        delta: cur
            .checked_sub(hist)
            .map_or(Metric::NotAvailable(Unavailable::UndefinedRatio), Metric::Value),
        pct_change: pct_change(cur, hist),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pct_change_regular() {
        let pct = pct_change(dec!(1000000), dec!(900000)).get().unwrap();
        assert!((pct - dec!(11.1111)).abs() < dec!(0.0001));
        assert_eq!(pct_change(dec!(50), dec!(100)), Metric::Value(dec!(-50)));
    }

    #[test]
    fn test_pct_change_zero_baseline() {
        assert_eq!(
            pct_change(dec!(500), Decimal::ZERO),
            Metric::NotAvailable(Unavailable::UndefinedRatio)
        );
        assert_eq!(pct_change(Decimal::ZERO, Decimal::ZERO), Metric::Value(Decimal::ZERO));
    }

    #[test]
    fn test_compare_values_complete() {
        let change = compare_values(
            Some(dec!(150000)),
            Some(dec!(140000)),
            DataCompleteness::Complete,
        );
        assert_eq!(change.delta, Metric::Value(dec!(10000)));
        assert!(change.pct_change.is_available());
    }

    #[test]
    fn test_compare_values_missing_baseline() {
        let change = compare_values(Some(dec!(450)), None, DataCompleteness::Complete);
        assert_eq!(change.delta, Metric::NotAvailable(Unavailable::MissingData));
        assert_eq!(change.pct_change, Metric::NotAvailable(Unavailable::MissingData));
        assert_eq!(change.current, Some(dec!(450)));
    }

    #[test]
    fn test_compare_values_estimated() {
        let change = compare_values(
            Some(dec!(150000)),
            Some(dec!(140000)),
            DataCompleteness::Estimated,
        );
        assert_eq!(change.current, Some(dec!(150000)));
        assert_eq!(change.historical, None);
        assert_eq!(change.pct_change, Metric::NotAvailable(Unavailable::Estimated));
    }
}
