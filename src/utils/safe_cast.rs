//! Safe conversions from user-supplied floating point values

use crate::{Error, Result};

/// Floor a duration in seconds and raise it to at least `min`.
///
/// NaN and negative inputs map to `min`; `+inf` and values beyond `u64` saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Range checked before the cast
#[allow(clippy::cast_sign_loss)] // Negative values are handled above
#[allow(clippy::cast_precision_loss)] // u64::MAX bound is approximate
pub fn whole_seconds_at_least(seconds: f64, min: u64) -> u64 {
    if seconds.is_nan() || seconds < 0.0 {
        return min;
    }

    let floored = seconds.floor();
    let whole = if floored >= u64::MAX as f64 { u64::MAX } else { floored as u64 };
    whole.max(min)
}

/// Parse a non-negative integer millisecond timestamp
///
/// # Errors
///
/// Returns an error if the text is not a non-negative integer
pub fn parse_millis(text: &str) -> Result<u64> {
    text.parse::<u64>()
        .map_err(|_| Error::InvalidInput(format!("'{text}' is not a millisecond timestamp")))
}
