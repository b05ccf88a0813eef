//! Smoothing filters for the elbow-angle stream.
//!
//! Every filter follows a freeze-on-gap policy: a frame without a reading
//! returns the last smoothed value untouched, so tracking dropouts never
//! reset or drift the estimate.

/// Exponential moving average, the default smoother
pub mod exponential;

use crate::constants::DEFAULT_SMOOTHING_ALPHA;
use crate::{Error, Result};

/// Trait for all angle filters
pub trait AngleFilter: Send + Sync {
    /// Feed one raw reading (or a gap) and get the current smoothed value
    fn apply(&mut self, raw: Option<f64>) -> Option<f64>;

    /// Last smoothed value without feeding a new reading
    fn current(&self) -> Option<f64>;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// Pass-through filter that only holds the last reading across gaps
#[derive(Debug, Default)]
pub struct NoFilter {
    last: Option<f64>,
}

impl AngleFilter for NoFilter {
    fn apply(&mut self, raw: Option<f64>) -> Option<f64> {
        if let Some(value) = raw.filter(|v| v.is_finite()) {
            self.last = Some(value);
        }
        self.last
    }

    fn current(&self) -> Option<f64> {
        self.last
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create an angle filter by type name.
///
/// Accepts `none`, `exponential` (alias `ema`) and `exponential:<alpha>`.
///
/// # Errors
///
/// Returns [`Error::FilterError`] for unknown names or invalid parameters.
pub fn create_filter(filter_type: &str) -> Result<Box<dyn AngleFilter>> {
    let lowered = filter_type.to_lowercase();
    let (name, param) = match lowered.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (lowered.as_str(), None),
    };

    match (name, param) {
        ("none" | "nofilter", None) => Ok(Box::new(NoFilter::default())),
        ("exponential" | "ema", None) => Ok(Box::new(exponential::ExponentialFilter::new(DEFAULT_SMOOTHING_ALPHA))),
        ("exponential" | "ema", Some(param)) => {
            let alpha: f64 = param
                .parse()
                .map_err(|_| Error::FilterError(format!("Alpha must be a number, got '{param}'")))?;
            Ok(Box::new(exponential::ExponentialFilter::try_new(alpha)?))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
