//! Numeric conversion helpers.

pub mod safe_cast;
