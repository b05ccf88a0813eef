//! Alarm clock controller that only goes quiet after verified exercise.
//!
//! The alarm cannot be stopped until the user has performed a target number
//! of repetitions, counted from a live body-pose stream:
//! 1. Pick the better-tracked arm from the frame's landmark confidences
//! 2. Measure the elbow angle from shoulder, elbow and wrist
//! 3. Smooth the angle with an exponential moving average
//! 4. Count `UP → DOWN → UP` cycles with hysteresis, debounce and a refractory gate
//! 5. Credit each counted repetition to the ringing alarm
//!
//! # Examples
//!
//! ## Angle at a joint
//!
//! ```
//! use exercise_alarm::geometry::{angle_degrees, Point2};
//!
//! let angle = angle_degrees(Point2::new(0.0, 1.0), Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
//! assert!((angle.unwrap() - 90.0).abs() < 1e-9);
//! ```
//!
//! ## Counting repetitions
//!
//! ```
//! use exercise_alarm::rep_counter::{RepCounter, RepEvent};
//! use std::time::Instant;
//!
//! let mut counter = RepCounter::default();
//! let now = Instant::now();
//! for angle in [90.0, 90.0, 170.0] {
//!     counter.update(Some(angle), now);
//! }
//! assert_eq!(counter.update(Some(170.0), now), RepEvent::Counted);
//! ```
//!
//! ## Gated alarm
//!
//! ```
//! use exercise_alarm::{clock::ManualClock, config::Config, controller::AlarmController};
//! use std::time::Duration;
//!
//! # fn main() -> exercise_alarm::Result<()> {
//! let clock = ManualClock::new();
//! let mut controller = AlarmController::from_config(&Config::default(), Box::new(clock.clone()))?;
//! controller.set_target_reps(1);
//!
//! controller.schedule_in_seconds(5.0, || println!("Wake up!"));
//! clock.advance(Duration::from_secs(5));
//! assert!(controller.tick());
//!
//! // Refused until the repetition is verified
//! assert!(controller.stop().is_err());
//! controller.manual_rep()?;
//! controller.stop()?;
//! # Ok(())
//! # }
//! ```

/// Alarm lifecycle state machine
pub mod alarm;

/// Time sources
pub mod clock;

/// Configuration management
pub mod config;

/// Constants used throughout the crate
pub mod constants;

/// Composition of the pose pipeline and the alarm
pub mod controller;

/// Error types and result handling
pub mod error;

/// Smoothing filters for the elbow angle
pub mod filters;

/// Planar joint-angle geometry
pub mod geometry;

/// Landmark frames and arm-side selection
pub mod landmarks;

/// Repetition state machine
pub mod rep_counter;

/// Recorded pose-stream replay
pub mod session;

/// Numeric conversion helpers
pub mod utils;

pub use error::{Error, Result};
