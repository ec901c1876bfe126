pub mod apr;
pub mod delta;
pub mod fees;

pub use apr::{AprAttempt, AprContext, AprResolution, AttemptOutcome, resolve_apr};
pub use delta::{Change, compare_values, pct_change};
