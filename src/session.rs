//! Headless replay of a recorded pose stream.
//!
//! A recording stands in for the live camera: each line is one frame with
//! its capture timestamp. Frames are throttled to the configured cadence and
//! fed to the controller strictly in order, one at a time.

use crate::clock::ManualClock;
use crate::controller::AlarmController;
use crate::rep_counter::RepEvent;
use crate::utils::safe_cast::parse_millis;
use crate::{Error, Result};
use log::{debug, info};
use std::fmt;
use std::path::Path;

/// Drops frames arriving faster than the target cadence
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl FrameThrottle {
    /// Create a throttle for `target_fps` frames per second
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            min_interval_ms: 1000 / u64::from(target_fps.max(1)),
            last_accepted_ms: None,
        }
    }

    /// Minimum spacing between accepted frames
    #[must_use]
    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// Whether a frame captured at `t_ms` should be processed
    pub fn accept(&mut self, t_ms: u64) -> bool {
        let ready = self
            .last_accepted_ms
            .map_or(true, |last| t_ms.saturating_sub(last) >= self.min_interval_ms);
        if ready {
            self.last_accepted_ms = Some(t_ms);
        }
        ready
    }
}

/// One frame of a recording
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Capture time in milliseconds since the session started
    pub t_ms: u64,
    /// Flat landmark values, or `None` for a "no data" frame
    pub values: Option<Vec<f64>>,
}

/// Parse a recording: `<t_ms> <v0> ... <v50>` or `<t_ms> -` per line.
///
/// Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns [`Error::FrameParse`] for malformed lines or timestamps that go backwards.
pub fn parse_recording(text: &str) -> Result<Vec<RecordedFrame>> {
    let mut frames: Vec<RecordedFrame> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let t_ms = fields
            .next()
            .map(parse_millis)
            .transpose()
            .map_err(|e| Error::FrameParse {
                line: line_no,
                reason: e.to_string(),
            })?
            .ok_or_else(|| Error::FrameParse {
                line: line_no,
                reason: "missing timestamp".to_string(),
            })?;

        if let Some(prev) = frames.last() {
            if t_ms < prev.t_ms {
                return Err(Error::FrameParse {
                    line: line_no,
                    reason: format!("timestamp {t_ms} is earlier than {}", prev.t_ms),
                });
            }
        }

        let rest: Vec<&str> = fields.collect();
        let values = match rest.as_slice() {
            [] | ["-"] => None,
            values => Some(
                values
                    .iter()
                    .map(|v| {
                        v.parse::<f64>().map_err(|_| Error::FrameParse {
                            line: line_no,
                            reason: format!("'{v}' is not a number"),
                        })
                    })
                    .collect::<Result<Vec<f64>>>()?,
            ),
        };

        frames.push(RecordedFrame { t_ms, values });
    }

    Ok(frames)
}

/// Read and parse a recording from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn read_recording<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedFrame>> {
    let text = std::fs::read_to_string(path)?;
    parse_recording(&text)
}

/// Outcome of a replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Frames in the recording that were reached
    pub frames: usize,
    /// Frames dropped by the throttle
    pub throttled: usize,
    /// Frames not evaluated because the alarm was not ringing
    pub ignored: usize,
    /// Frames that produced no usable reading
    pub rejected: usize,
    /// Repetitions verified
    pub reps_counted: u32,
    /// Completed cycles dropped by the refractory gate
    pub suppressed: usize,
    /// When the alarm started ringing
    pub fired_at_ms: Option<u64>,
    /// When the alarm was stopped
    pub stopped_at_ms: Option<u64>,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "frames: {} (throttled {}, ignored {}, rejected {})",
            self.frames, self.throttled, self.ignored, self.rejected
        )?;
        writeln!(f, "reps: {} verified, {} suppressed", self.reps_counted, self.suppressed)?;
        match self.fired_at_ms {
            Some(t) => writeln!(f, "rang at: {t} ms")?,
            None => writeln!(f, "rang at: never")?,
        }
        match self.stopped_at_ms {
            Some(t) => write!(f, "stopped at: {t} ms"),
            None => write!(f, "stopped at: still ringing"),
        }
    }
}

/// Drives a controller through a recording on a manual clock
pub struct ReplaySession {
    controller: AlarmController,
    clock: ManualClock,
    throttle: FrameThrottle,
}

impl ReplaySession {
    /// Create a session; `clock` must be the clock the controller reads
    #[must_use]
    pub fn new(controller: AlarmController, clock: ManualClock, target_fps: u32) -> Self {
        Self {
            controller,
            clock,
            throttle: FrameThrottle::new(target_fps),
        }
    }

    /// Arm the alarm at t=0, play every frame, and stop as soon as the reps are verified
    pub fn run(&mut self, delay_seconds: f64, frames: &[RecordedFrame]) -> ReplaySummary {
        self.controller
            .schedule_in_seconds(delay_seconds, || info!("Wake up! Verify reps to stop the alarm"));

        let mut summary = ReplaySummary::default();
        for frame in frames {
            summary.frames += 1;
            self.clock.set_elapsed_ms(frame.t_ms);

            if self.controller.tick() {
                info!("Alarm fired at {} ms", frame.t_ms);
                summary.fired_at_ms = Some(frame.t_ms);
            }

            if !self.throttle.accept(frame.t_ms) {
                summary.throttled += 1;
                continue;
            }

            let report = self.controller.handle_frame(frame.values.as_deref());
            if report.ignored {
                summary.ignored += 1;
                continue;
            }
            if report.rejection.is_some() {
                summary.rejected += 1;
            }
            if report.event == RepEvent::Suppressed {
                summary.suppressed += 1;
            }
            debug!("t={} {report}", frame.t_ms);

            if self.controller.done() {
                summary.reps_counted = self.controller.current_reps();
                if self.controller.stop().is_ok() {
                    summary.stopped_at_ms = Some(frame.t_ms);
                    info!("Alarm stopped after verified reps at {} ms", frame.t_ms);
                }
                break;
            }
        }

        if summary.stopped_at_ms.is_none() {
            summary.reps_counted = self.controller.current_reps();
        }
        summary
    }

    /// Controller being driven
    #[must_use]
    pub fn controller(&self) -> &AlarmController {
        &self.controller
    }
}
