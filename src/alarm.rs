//! Alarm lifecycle: `IDLE → ARMED → RINGING → IDLE`.
//!
//! The session owns at most one pending wake timer. Scheduling replaces the
//! previous timer by dropping it, together with its callback, so a replaced
//! or cancelled timer has nothing left that could fire.

use crate::constants::{DEFAULT_TARGET_REPS, MAX_DELAY_SECONDS, MIN_DELAY_SECONDS};
use crate::utils::safe_cast::whole_seconds_at_least;
use crate::{Error, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Alarm status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmStatus {
    /// Nothing scheduled
    #[default]
    Idle,
    /// Wake timer pending
    Armed,
    /// Waiting for verified repetitions
    Ringing,
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Armed => "ARMED",
            Self::Ringing => "RINGING",
        };
        f.write_str(name)
    }
}

/// Exercise that unlocks the alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Push-ups, counted from the elbow angle
    #[default]
    Pushups,
    /// Sit-ups, counted manually
    Situps,
}

impl ExerciseKind {
    /// Whether reps of this exercise are counted from the pose stream
    #[must_use]
    pub const fn is_pose_tracked(self) -> bool {
        matches!(self, Self::Pushups)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pushups => f.write_str("pushups"),
            Self::Situps => f.write_str("situps"),
        }
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pushups" | "pushup" => Ok(Self::Pushups),
            "situps" | "situp" => Ok(Self::Situps),
            other => Err(Error::InvalidInput(format!("Unknown exercise: {other}"))),
        }
    }
}

/// Identifier of a scheduled wake timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

type FireCallback = Box<dyn FnOnce() + Send>;

struct PendingTimer {
    id: TimerId,
    deadline: Instant,
    on_fire: FireCallback,
}

impl fmt::Debug for PendingTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTimer")
            .field("id", &self.id)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// Alarm session state
#[derive(Debug)]
pub struct AlarmSession {
    status: AlarmStatus,
    exercise: ExerciseKind,
    target_reps: u32,
    current_reps: u32,
    pending: Option<PendingTimer>,
    next_timer_id: u64,
}

impl AlarmSession {
    /// Create an idle session with default exercise and target
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: AlarmStatus::Idle,
            exercise: ExerciseKind::default(),
            target_reps: DEFAULT_TARGET_REPS,
            current_reps: 0,
            pending: None,
            next_timer_id: 0,
        }
    }

    /// Arm a single-shot wake `seconds` from `now`.
    ///
    /// Any earlier timer is dropped first. `seconds` is floored, raised to
    /// at least one second and capped at [`MAX_DELAY_SECONDS`].
    pub fn schedule_in_seconds<F>(&mut self, seconds: f64, now: Instant, on_fire: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(old) = self.pending.take() {
            debug!("Replacing pending timer {:?}", old.id);
        }

        let whole = whole_seconds_at_least(seconds, MIN_DELAY_SECONDS).min(MAX_DELAY_SECONDS);
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.pending = Some(PendingTimer {
            id,
            deadline: now + Duration::from_secs(whole),
            on_fire: Box::new(on_fire),
        });
        self.status = AlarmStatus::Armed;

        info!("Alarm armed for {whole}s");
        id
    }

    /// Fire the pending timer if its deadline has passed.
    ///
    /// Returns `true` if the alarm started ringing on this call.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self.pending.as_ref().is_some_and(|t| t.deadline <= now);
        if !due {
            return false;
        }
        let Some(timer) = self.pending.take() else {
            return false;
        };

        self.current_reps = 0;
        self.status = AlarmStatus::Ringing;
        info!("Alarm timer {:?} fired, ringing", timer.id);
        (timer.on_fire)();
        true
    }

    /// Drop the pending timer and return to `IDLE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the alarm is `ARMED`.
    pub fn cancel(&mut self) -> Result<()> {
        if self.status != AlarmStatus::Armed {
            warn!("Ignoring cancel while {}", self.status);
            return Err(Error::InvalidTransition {
                from: self.status,
                action: "cancel",
            });
        }

        self.pending = None;
        self.status = AlarmStatus::Idle;
        info!("Alarm cancelled");
        Ok(())
    }

    /// Start ringing immediately, whatever the current state.
    ///
    /// A pending timer is dropped since the wake it stood for has happened.
    pub fn ring(&mut self) {
        self.pending = None;
        self.current_reps = 0;
        self.status = AlarmStatus::Ringing;
        info!("Alarm ringing");
    }

    /// Silence the alarm and clear progress.
    ///
    /// This primitive is ungated; the controller decides when it may be used.
    pub fn stop(&mut self) {
        self.pending = None;
        self.current_reps = 0;
        self.status = AlarmStatus::Idle;
        info!("Alarm stopped");
    }

    /// Add verified repetitions, saturating at the target. Returns the new count.
    pub fn increment_rep(&mut self, delta: u32) -> u32 {
        self.current_reps = self.current_reps.saturating_add(delta).min(self.target_reps);
        self.current_reps
    }

    /// Clear progress without changing status
    pub fn reset_reps(&mut self) {
        self.current_reps = 0;
    }

    /// Change the exercise
    pub fn set_exercise(&mut self, exercise: ExerciseKind) {
        self.exercise = exercise;
    }

    /// Change the target, at least one; progress is clamped to it
    pub fn set_target_reps(&mut self, target: u32) {
        self.target_reps = target.max(1);
        self.current_reps = self.current_reps.min(self.target_reps);
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> AlarmStatus {
        self.status
    }

    /// Selected exercise
    #[must_use]
    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    /// Repetitions required to stop
    #[must_use]
    pub fn target_reps(&self) -> u32 {
        self.target_reps
    }

    /// Repetitions verified so far
    #[must_use]
    pub fn current_reps(&self) -> u32 {
        self.current_reps
    }

    /// Identifier of the pending timer, if any
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending.as_ref().map(|t| t.id)
    }

    /// When the pending timer fires, if any
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|t| t.deadline)
    }
}

impl Default for AlarmSession {
    fn default() -> Self {
        Self::new()
    }
}
