use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a metric could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// A required input was absent upstream.
    MissingData,
    /// The ratio's denominator was zero (or not positive where required).
    UndefinedRatio,
    /// Only an extrapolated window was available, so no baseline exists.
    Estimated,
}

/// A computed value or an explicit "N/A" marker.
///
/// Never use zero, NaN or an empty string to stand in for missing data;
/// "no change" and "no data" must stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    Value(T),
    NotAvailable(Unavailable),
}

impl<T> Metric<T> {
    pub const MISSING: Metric<T> = Metric::NotAvailable(Unavailable::MissingData);

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotAvailable(_) => None,
        }
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotAvailable(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Metric<U> {
        match self {
            Self::Value(v) => Metric::Value(f(v)),
            Self::NotAvailable(reason) => Metric::NotAvailable(reason),
        }
    }

    /// Wraps an optional input, marking absence as missing data.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::MISSING, Self::Value)
    }
}

impl<T: Copy> Metric<T> {
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => v.fmt(f),
            Self::NotAvailable(_) => f.write_str(super::NOT_AVAILABLE),
        }
    }
}
