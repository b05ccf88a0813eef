//! Exercise-verified alarm controller.
//!
//! Composes the pose pipeline (side selection, smoothing, repetition
//! counting) with the alarm session. Counted repetitions advance the alarm's
//! progress, and stopping the alarm is refused until the target is met.

use crate::alarm::{AlarmSession, AlarmStatus, ExerciseKind, TimerId};
use crate::clock::Clock;
use crate::config::Config;
use crate::filters::AngleFilter;
use crate::landmarks::{evaluate_frame, FrameReading, FrameRejection, LandmarkSet, Side};
use crate::rep_counter::{Phase, RepConfig, RepCounter, RepEvent};
use crate::{Error, Result};
use log::{debug, info, warn};
use std::fmt;

/// Diagnostics for one processed frame. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Arm the reading came from
    pub side: Option<Side>,
    /// Quality score of the chosen (or best) arm
    pub quality: f64,
    /// Unsmoothed elbow angle
    pub raw_angle: Option<f64>,
    /// Smoothed elbow angle after this frame
    pub smoothed_angle: Option<f64>,
    /// Repetition phase after this frame
    pub phase: Phase,
    /// What the repetition machine did with this frame
    pub event: RepEvent,
    /// Why the frame produced no reading
    pub rejection: Option<FrameRejection>,
    /// The frame was not evaluated (alarm not ringing or exercise not pose tracked)
    pub ignored: bool,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.smoothed_angle {
            Some(angle) => write!(f, "elbow: {angle:.0}°")?,
            None => f.write_str("elbow: --°")?,
        }
        match self.side {
            Some(side) => write!(f, " ({side} q={:.2})", self.quality),
            None => write!(f, " (none q={:.2})", self.quality),
        }
    }
}

/// Alarm controller gated on verified repetitions
pub struct AlarmController {
    alarm: AlarmSession,
    filter: Box<dyn AngleFilter>,
    reps: RepCounter,
    clock: Box<dyn Clock>,
    min_quality: f64,
}

impl AlarmController {
    /// Create a controller from its parts
    #[must_use]
    pub fn new(filter: Box<dyn AngleFilter>, rep_config: RepConfig, min_quality: f64, clock: Box<dyn Clock>) -> Self {
        Self {
            alarm: AlarmSession::new(),
            filter,
            reps: RepCounter::new(rep_config),
            clock,
            min_quality,
        }
    }

    /// Create a controller from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn from_config(config: &Config, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let mut controller = Self::new(config.create_filter()?, config.rep_config(), config.pose.min_quality, clock);
        controller.alarm.set_exercise(config.alarm.exercise);
        controller.alarm.set_target_reps(config.alarm.target_reps);

        info!(
            "Controller ready: {} x{} with {} smoothing",
            config.alarm.exercise,
            config.alarm.target_reps,
            controller.filter.name()
        );
        Ok(controller)
    }

    /// Arm the alarm `seconds` from now, replacing any pending wake
    pub fn schedule_in_seconds<F>(&mut self, seconds: f64, on_fire: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let now = self.clock.now();
        self.alarm.schedule_in_seconds(seconds, now, on_fire)
    }

    /// Fire the pending timer if it is due. Returns `true` when the alarm started ringing.
    pub fn tick(&mut self) -> bool {
        let fired = self.alarm.poll(self.clock.now());
        if fired {
            self.reset_pose_state();
        }
        fired
    }

    /// Cancel a pending wake
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the alarm is armed
    pub fn cancel(&mut self) -> Result<()> {
        self.alarm.cancel()
    }

    /// Start ringing immediately
    pub fn ring(&mut self) {
        self.alarm.ring();
        self.reset_pose_state();
    }

    /// Feed one pose frame; `None` is an explicit "no data" frame.
    ///
    /// Frames are only evaluated while the alarm rings and the exercise is
    /// counted from the pose stream.
    pub fn handle_frame(&mut self, frame: Option<&[f64]>) -> FrameReport {
        let now = self.clock.now();

        if self.alarm.status() != AlarmStatus::Ringing || !self.alarm.exercise().is_pose_tracked() {
            return FrameReport {
                ignored: true,
                rejection: None,
                ..self.report(FrameReading::rejected(FrameRejection::NoData), RepEvent::None)
            };
        }

        let reading = match frame.map(LandmarkSet::from_flat) {
            None => FrameReading::rejected(FrameRejection::NoData),
            Some(Err(rejection)) => FrameReading::rejected(rejection),
            Some(Ok(set)) => evaluate_frame(&set, self.min_quality),
        };

        let smoothed = self.filter.apply(reading.angle);
        // Rejected frames leave the repetition machine untouched
        let sample = reading.angle.and(smoothed);
        let event = self.reps.update(sample, now);

        if event == RepEvent::Counted {
            let count = self.alarm.increment_rep(1);
            info!("Verified rep {count}/{}", self.alarm.target_reps());
        }

        let report = self.report(reading, event);
        match report.rejection {
            Some(rejection) => debug!("Frame skipped ({rejection}): {report}"),
            None => debug!("{report} phase={}", report.phase),
        }
        report
    }

    fn report(&self, reading: FrameReading, event: RepEvent) -> FrameReport {
        FrameReport {
            side: reading.side,
            quality: reading.quality,
            raw_angle: reading.angle,
            smoothed_angle: self.filter.current(),
            phase: self.reps.phase(),
            event,
            rejection: reading.rejection,
            ignored: false,
        }
    }

    /// Whether enough repetitions have been verified to stop the alarm
    #[must_use]
    pub fn done(&self) -> bool {
        self.alarm.current_reps() >= self.alarm.target_reps()
    }

    /// Stop the alarm once the target has been met.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotVerified`] and leaves everything unchanged while
    /// the target has not been reached.
    pub fn stop(&mut self) -> Result<()> {
        if !self.done() {
            warn!(
                "Stop refused: {}/{} reps",
                self.alarm.current_reps(),
                self.alarm.target_reps()
            );
            return Err(Error::NotVerified {
                current: self.alarm.current_reps(),
                target: self.alarm.target_reps(),
            });
        }

        self.alarm.stop();
        self.reset_pose_state();
        Ok(())
    }

    /// Manually credit one repetition, the "+1 rep" affordance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RepsComplete`] once the target has been met.
    pub fn manual_rep(&mut self) -> Result<u32> {
        if self.done() {
            return Err(Error::RepsComplete);
        }
        Ok(self.alarm.increment_rep(1))
    }

    /// Clear repetition progress without changing status
    pub fn reset_reps(&mut self) {
        self.alarm.reset_reps();
    }

    /// Change the exercise; pose tracking starts over
    pub fn set_exercise(&mut self, exercise: ExerciseKind) {
        if exercise != self.alarm.exercise() {
            self.reset_pose_state();
        }
        self.alarm.set_exercise(exercise);
    }

    /// Change the target; current progress is clamped to it
    pub fn set_target_reps(&mut self, target: u32) {
        self.alarm.set_target_reps(target);
    }

    fn reset_pose_state(&mut self) {
        self.filter.reset();
        self.reps.reset();
    }

    /// Alarm status
    #[must_use]
    pub fn status(&self) -> AlarmStatus {
        self.alarm.status()
    }

    /// Verified repetitions
    #[must_use]
    pub fn current_reps(&self) -> u32 {
        self.alarm.current_reps()
    }

    /// Repetitions required to stop
    #[must_use]
    pub fn target_reps(&self) -> u32 {
        self.alarm.target_reps()
    }

    /// Selected exercise
    #[must_use]
    pub fn exercise(&self) -> ExerciseKind {
        self.alarm.exercise()
    }

    /// Current repetition phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.reps.phase()
    }

    /// Underlying alarm session
    #[must_use]
    pub fn alarm(&self) -> &AlarmSession {
        &self.alarm
    }

    /// Underlying repetition counter
    #[must_use]
    pub fn rep_counter(&self) -> &RepCounter {
        &self.reps
    }
}

impl fmt::Debug for AlarmController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlarmController")
            .field("alarm", &self.alarm)
            .field("filter", &self.filter.name())
            .field("reps", &self.reps)
            .field("min_quality", &self.min_quality)
            .finish_non_exhaustive()
    }
}
