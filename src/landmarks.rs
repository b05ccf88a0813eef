//! Body landmark frames and arm-side selection.
//!
//! A frame carries one `(y, x, confidence)` triple per landmark in the fixed
//! MoveNet ordering. Each frame the better-tracked arm is picked by a
//! confidence-weighted score and its shoulder, elbow and wrist are turned
//! into an elbow angle.

use crate::constants::{
    ELBOW_WEIGHT, FLAT_FRAME_LEN, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, NUM_BODY_LANDMARKS, RIGHT_ELBOW,
    RIGHT_SHOULDER, RIGHT_WRIST, SHOULDER_WEIGHT, VALUES_PER_LANDMARK, WRIST_WEIGHT,
};
use crate::geometry::{angle_degrees, Point2};
use std::fmt;

/// A single tracked body point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// Vertical position in normalized frame coordinates
    pub y: f64,
    /// Horizontal position in normalized frame coordinates
    pub x: f64,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

impl Landmark {
    /// Create a new landmark
    #[must_use]
    pub const fn new(y: f64, x: f64, confidence: f64) -> Self {
        Self { y, x, confidence }
    }

    /// Position as a planar point
    #[must_use]
    pub const fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Confidence clamped to [0, 1]; non-finite values count as zero
    #[must_use]
    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Why a frame produced no usable angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRejection {
    /// The pose source explicitly reported no data
    NoData,
    /// The frame did not carry the expected number of landmarks
    MalformedFrame,
    /// Neither arm reached the minimum quality score
    LowConfidence,
    /// The chosen arm collapsed to a point, so no angle exists
    DegenerateGeometry,
}

impl fmt::Display for FrameRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoData => "no data",
            Self::MalformedFrame => "malformed frame",
            Self::LowConfidence => "low confidence",
            Self::DegenerateGeometry => "degenerate geometry",
        };
        f.write_str(name)
    }
}

/// Fixed-arity landmark set for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; NUM_BODY_LANDMARKS],
}

impl LandmarkSet {
    /// Build a set from landmarks already in MoveNet order
    #[must_use]
    pub const fn new(points: [Landmark; NUM_BODY_LANDMARKS]) -> Self {
        Self { points }
    }

    /// Parse a flat `[y, x, score] × 17` array.
    ///
    /// Trailing values beyond the expected length are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FrameRejection::MalformedFrame`] if fewer values than expected are supplied.
    pub fn from_flat(values: &[f64]) -> std::result::Result<Self, FrameRejection> {
        if values.len() < FLAT_FRAME_LEN {
            return Err(FrameRejection::MalformedFrame);
        }

        let mut points = [Landmark::default(); NUM_BODY_LANDMARKS];
        for (point, chunk) in points.iter_mut().zip(values.chunks_exact(VALUES_PER_LANDMARK)) {
            *point = Landmark::new(chunk[0], chunk[1], chunk[2]);
        }
        Ok(Self { points })
    }

    /// Landmark at a MoveNet index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// All landmarks in order
    #[must_use]
    pub fn points(&self) -> &[Landmark; NUM_BODY_LANDMARKS] {
        &self.points
    }

    /// Shoulder, elbow and wrist of one arm
    #[must_use]
    pub fn arm(&self, side: Side) -> [Landmark; 3] {
        let [s, e, w] = side.indices();
        [self.points[s], self.points[e], self.points[w]]
    }
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left arm
    Left,
    /// Right arm
    Right,
}

impl Side {
    /// Shoulder, elbow and wrist indices for this side
    #[must_use]
    pub const fn indices(self) -> [usize; 3] {
        match self {
            Self::Left => [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST],
            Self::Right => [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST],
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Weighted tracking quality of one arm
#[must_use]
pub fn side_quality(set: &LandmarkSet, side: Side) -> f64 {
    let [shoulder, elbow, wrist] = set.arm(side);
    SHOULDER_WEIGHT * shoulder.clamped_confidence()
        + ELBOW_WEIGHT * elbow.clamped_confidence()
        + WRIST_WEIGHT * wrist.clamped_confidence()
}

/// Pick the better-tracked arm.
///
/// Returns the chosen side (ties go left) and its score, or `None` with the
/// best score when neither side reaches `min_quality`.
#[must_use]
pub fn select_side(set: &LandmarkSet, min_quality: f64) -> (Option<Side>, f64) {
    let left = side_quality(set, Side::Left);
    let right = side_quality(set, Side::Right);

    let (side, quality) = if left >= right { (Side::Left, left) } else { (Side::Right, right) };
    if quality >= min_quality {
        (Some(side), quality)
    } else {
        (None, quality)
    }
}

/// Per-frame output of side selection and angle extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReading {
    /// Elbow angle of the chosen arm, if one could be measured
    pub angle: Option<f64>,
    /// Arm the angle came from
    pub side: Option<Side>,
    /// Quality score of the chosen (or best) arm
    pub quality: f64,
    /// Set when the frame yields no angle
    pub rejection: Option<FrameRejection>,
}

impl FrameReading {
    /// Reading for a frame that carried nothing usable
    #[must_use]
    pub const fn rejected(rejection: FrameRejection) -> Self {
        Self {
            angle: None,
            side: None,
            quality: 0.0,
            rejection: Some(rejection),
        }
    }
}

/// Select an arm and measure its elbow angle.
///
/// A low-quality frame reports no side. A degenerate arm still reports the
/// chosen side and quality so callers can show why no angle was produced.
#[must_use]
pub fn evaluate_frame(set: &LandmarkSet, min_quality: f64) -> FrameReading {
    let (side, quality) = select_side(set, min_quality);
    let Some(side) = side else {
        return FrameReading {
            angle: None,
            side: None,
            quality,
            rejection: Some(FrameRejection::LowConfidence),
        };
    };

    let [shoulder, elbow, wrist] = set.arm(side);
    let angle = angle_degrees(shoulder.point(), elbow.point(), wrist.point());
    FrameReading {
        angle,
        side: Some(side),
        quality,
        rejection: angle.is_none().then_some(FrameRejection::DegenerateGeometry),
    }
}
