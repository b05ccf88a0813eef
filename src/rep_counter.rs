//! Repetition counting from a smoothed elbow-angle stream.
//!
//! The counter is a two-phase hysteresis machine. A phase flip needs
//! `stable_frames` consecutive samples beyond the threshold of the opposite
//! phase, and a completed `DOWN → UP` cycle only counts if the refractory
//! period since the last counted repetition has passed.
//!
//! ```text
//!          angle < down_angle × stable_frames
//!   ┌────┐ ─────────────────────────────────► ┌──────┐
//!   │ UP │                                     │ DOWN │
//!   └────┘ ◄───────────────────────────────── └──────┘
//!          angle > up_angle × stable_frames
//!          (counts unless inside refractory)
//! ```

use crate::constants::{DOWN_ANGLE, REFRACTORY_MS, STABLE_FRAMES, UP_ANGLE};
use log::{debug, info};
use std::fmt;
use std::time::{Duration, Instant};

/// Arm phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Arm extended
    #[default]
    Up,
    /// Arm flexed
    Down,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("UP"),
            Self::Down => f.write_str("DOWN"),
        }
    }
}

/// Outcome of feeding one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepEvent {
    /// No phase change
    None,
    /// Moved from `UP` to `DOWN`
    EnteredDown,
    /// Completed a cycle and counted a repetition
    Counted,
    /// Completed a cycle inside the refractory period; not counted
    Suppressed,
}

/// Thresholds for the repetition machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepConfig {
    /// Angle below which the arm counts as flexed
    pub down_angle: f64,
    /// Angle above which the arm counts as extended
    pub up_angle: f64,
    /// Consecutive qualifying samples required for a flip
    pub stable_frames: u32,
    /// Minimum time between two counted repetitions
    pub refractory: Duration,
}

impl Default for RepConfig {
    fn default() -> Self {
        Self {
            down_angle: DOWN_ANGLE,
            up_angle: UP_ANGLE,
            stable_frames: STABLE_FRAMES,
            refractory: Duration::from_millis(REFRACTORY_MS),
        }
    }
}

/// Debounced hysteresis repetition counter
#[derive(Debug, Clone)]
pub struct RepCounter {
    config: RepConfig,
    phase: Phase,
    down_streak: u32,
    up_streak: u32,
    last_rep_at: Option<Instant>,
    counted: u64,
    suppressed: u64,
}

impl RepCounter {
    /// Create a new counter in the `UP` phase.
    ///
    /// `stable_frames` is raised to at least one.
    #[must_use]
    pub fn new(config: RepConfig) -> Self {
        Self {
            config: RepConfig {
                stable_frames: config.stable_frames.max(1),
                ..config
            },
            phase: Phase::Up,
            down_streak: 0,
            up_streak: 0,
            last_rep_at: None,
            counted: 0,
            suppressed: 0,
        }
    }

    /// Feed one smoothed sample taken at `now`.
    ///
    /// `None` means the frame was rejected upstream; it leaves phase and
    /// streaks exactly as they were.
    pub fn update(&mut self, sample: Option<f64>, now: Instant) -> RepEvent {
        let Some(angle) = sample.filter(|a| a.is_finite()) else {
            return RepEvent::None;
        };

        match self.phase {
            Phase::Up => {
                if angle < self.config.down_angle {
                    self.down_streak += 1;
                } else {
                    self.down_streak = 0;
                }

                if self.down_streak >= self.config.stable_frames {
                    self.phase = Phase::Down;
                    self.down_streak = 0;
                    debug!("Phase UP -> DOWN at {angle:.1}°");
                    return RepEvent::EnteredDown;
                }
            }
            Phase::Down => {
                if angle > self.config.up_angle {
                    self.up_streak += 1;
                } else {
                    self.up_streak = 0;
                }

                if self.up_streak >= self.config.stable_frames {
                    self.phase = Phase::Up;
                    self.up_streak = 0;
                    return self.complete_cycle(now);
                }
            }
        }

        RepEvent::None
    }

    fn complete_cycle(&mut self, now: Instant) -> RepEvent {
        let outside_refractory = self
            .last_rep_at
            .map_or(true, |last| now.saturating_duration_since(last) > self.config.refractory);

        if outside_refractory {
            self.last_rep_at = Some(now);
            self.counted += 1;
            info!("Repetition counted ({} total)", self.counted);
            RepEvent::Counted
        } else {
            self.suppressed += 1;
            debug!("Repetition suppressed inside refractory period");
            RepEvent::Suppressed
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Consecutive samples below the down threshold while `UP`
    #[must_use]
    pub fn down_streak(&self) -> u32 {
        self.down_streak
    }

    /// Consecutive samples above the up threshold while `DOWN`
    #[must_use]
    pub fn up_streak(&self) -> u32 {
        self.up_streak
    }

    /// Time of the last counted repetition
    #[must_use]
    pub fn last_rep_at(&self) -> Option<Instant> {
        self.last_rep_at
    }

    /// Repetitions counted since the last reset
    #[must_use]
    pub fn counted(&self) -> u64 {
        self.counted
    }

    /// Cycles dropped by the refractory gate since the last reset
    #[must_use]
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Active thresholds
    #[must_use]
    pub fn config(&self) -> &RepConfig {
        &self.config
    }

    /// Return to the initial `UP` phase and forget all history
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(RepConfig::default())
    }
}
