use crate::error::MetricsError;
use rust_decimal::Decimal;

const YEAR_DAYS: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Annualizes fees earned over a window against the pool's TVL.
///
/// `APR = (fees / days) * 365 / tvl`, returned as a fraction (0.05 = 5%).
///
/// # Errors
///
/// Returns [`MetricsError::NonPositiveTvl`] when `tvl <= 0`,
/// [`MetricsError::ZeroWindow`] when `days == 0`, and
/// [`MetricsError::Overflow`] if the result does not fit a `Decimal`.
pub fn annualize_fees(fees: Decimal, tvl: Decimal, days: u32) -> Result<Decimal, MetricsError> {
    if tvl <= Decimal::ZERO {
        return Err(MetricsError::NonPositiveTvl);
    }
    if days == 0 {
        return Err(MetricsError::ZeroWindow);
    }

    let daily = fees
        .checked_div(Decimal::from(days))
        .ok_or(MetricsError::Overflow("daily fees"))?;
    daily
        .checked_mul(YEAR_DAYS)
        .and_then(|yearly| yearly.checked_div(tvl))
        .ok_or(MetricsError::Overflow("fee APR"))
}

/// Extrapolates a window total from a 24h figure.
///
/// # Errors
///
/// Returns [`MetricsError::Overflow`] if the product does not fit.
pub fn extrapolate_daily(daily: Decimal, days: u32) -> Result<Decimal, MetricsError> {
    daily
        .checked_mul(Decimal::from(days))
        .ok_or(MetricsError::Overflow("window extrapolation"))
}
