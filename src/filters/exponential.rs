use super::AngleFilter;
use crate::{Error, Result};

/// Exponential smoothing filter with freeze-on-gap
#[derive(Debug, Clone)]
pub struct ExponentialFilter {
    alpha: f64,
    smoothed: Option<f64>,
}

impl ExponentialFilter {
    /// Create a new exponential filter
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, smoothed: None }
    }

    /// Create a new exponential filter, validating alpha
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterError`] if alpha is not in the range (0, 1]
    pub fn try_new(alpha: f64) -> Result<Self> {
        if alpha > 0.0 && alpha <= 1.0 {
            Ok(Self { alpha, smoothed: None })
        } else {
            Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")))
        }
    }

    /// Smoothing factor
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl AngleFilter for ExponentialFilter {
    fn apply(&mut self, raw: Option<f64>) -> Option<f64> {
        let Some(raw) = raw.filter(|v| v.is_finite()) else {
            return self.smoothed;
        };

        let next = match self.smoothed {
            Some(last) => self.alpha.mul_add(raw - last, last),
            None => raw,
        };
        self.smoothed = Some(next);
        self.smoothed
    }

    fn current(&self) -> Option<f64> {
        self.smoothed
    }

    fn reset(&mut self) {
        self.smoothed = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.25);

        // First value passes through
        assert_eq!(filter.apply(Some(100.0)), Some(100.0));

        // Second value is smoothed
        assert_eq!(filter.apply(Some(180.0)), Some(120.0)); // 100 + 0.25 * 80
    }

    #[test]
    fn test_gap_freezes_estimate() {
        let mut filter = ExponentialFilter::new(0.25);
        assert_eq!(filter.apply(None), None);

        filter.apply(Some(160.0));
        assert_eq!(filter.apply(None), Some(160.0));
        assert_eq!(filter.apply(Some(f64::INFINITY)), Some(160.0));
        assert_eq!(filter.current(), Some(160.0));
    }

    #[test]
    fn test_alpha_bounds() {
        // High alpha = less smoothing
        let mut filter1 = ExponentialFilter::new(0.9);
        filter1.apply(Some(10.0));
        let p = filter1.apply(Some(20.0)).unwrap();
        assert!((p - 19.0).abs() < 0.001);

        // Low alpha = more smoothing
        let mut filter2 = ExponentialFilter::new(0.1);
        filter2.apply(Some(10.0));
        let p = filter2.apply(Some(20.0)).unwrap();
        assert!((p - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_reset() {
        let mut filter = ExponentialFilter::new(0.5);
        filter.apply(Some(90.0));
        filter.reset();
        assert_eq!(filter.current(), None);
        assert_eq!(filter.apply(Some(170.0)), Some(170.0));
    }

    #[test]
    fn test_try_new_rejects_bad_alpha() {
        assert!(ExponentialFilter::try_new(0.0).is_err());
        assert!(ExponentialFilter::try_new(1.5).is_err());
        assert!(ExponentialFilter::try_new(f64::NAN).is_err());
        assert!(ExponentialFilter::try_new(1.0).is_ok());
    }
}
