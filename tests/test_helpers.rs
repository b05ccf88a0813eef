//! Helper functions and utilities for tests

#![allow(dead_code)]

use exercise_alarm::clock::ManualClock;
use exercise_alarm::constants::{
    FLAT_FRAME_LEN, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_WRIST,
};
use exercise_alarm::controller::AlarmController;
use exercise_alarm::rep_counter::{Phase, RepEvent};
use std::time::Duration;

const LIMB: f64 = 0.2;

fn put(frame: &mut [f64], index: usize, x: f64, y: f64, confidence: f64) {
    frame[index * 3] = y;
    frame[index * 3 + 1] = x;
    frame[index * 3 + 2] = confidence;
}

/// Flat frame with both elbows bent to `angle_deg` and the given arm confidences
pub fn arm_frame(angle_deg: f64, left_confidence: f64, right_confidence: f64) -> Vec<f64> {
    let mut frame = vec![0.0; FLAT_FRAME_LEN];
    let theta = angle_deg.to_radians();

    for (elbow_x, [shoulder, elbow, wrist], confidence) in [
        (0.6, [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST], left_confidence),
        (0.4, [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST], right_confidence),
    ] {
        let elbow_y = 0.5;
        put(&mut frame, shoulder, elbow_x, elbow_y - LIMB, confidence);
        put(&mut frame, elbow, elbow_x, elbow_y, confidence);
        put(&mut frame, wrist, elbow_x + LIMB * theta.sin(), elbow_y - LIMB * theta.cos(), confidence);
    }
    frame
}

/// Well-tracked frame at `angle_deg`
pub fn good_frame(angle_deg: f64) -> Vec<f64> {
    arm_frame(angle_deg, 0.9, 0.1)
}

/// Frame where neither arm is tracked well enough
pub fn poor_frame(angle_deg: f64) -> Vec<f64> {
    arm_frame(angle_deg, 0.1, 0.05)
}

/// Feed frames at `angle_deg` until the phase becomes `target`, advancing the clock per frame.
///
/// Returns the event of the frame that flipped the phase.
pub fn drive_to_phase(
    controller: &mut AlarmController,
    clock: &ManualClock,
    angle_deg: f64,
    target: Phase,
    step: Duration,
) -> RepEvent {
    let frame = good_frame(angle_deg);
    for _ in 0..50 {
        clock.advance(step);
        let report = controller.handle_frame(Some(frame.as_slice()));
        if report.phase == target {
            return report.event;
        }
    }
    panic!("phase never reached {target}");
}

/// One full push-up: flex until `DOWN`, extend until `UP`
pub fn perform_rep(controller: &mut AlarmController, clock: &ManualClock, step: Duration) -> RepEvent {
    drive_to_phase(controller, clock, 80.0, Phase::Down, step);
    drive_to_phase(controller, clock, 175.0, Phase::Up, step)
}
