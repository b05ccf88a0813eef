//! Constants used throughout the application

/// Number of body landmarks delivered per frame (MoveNet single-pose layout)
pub const NUM_BODY_LANDMARKS: usize = 17;

/// Values per landmark in a flat frame: y, x, confidence
pub const VALUES_PER_LANDMARK: usize = 3;

/// Total values in a flat landmark frame (17 points × 3 values)
pub const FLAT_FRAME_LEN: usize = NUM_BODY_LANDMARKS * VALUES_PER_LANDMARK;

/// Landmark indices in the MoveNet layout
pub const LEFT_SHOULDER: usize = 5;
pub const RIGHT_SHOULDER: usize = 6;
pub const LEFT_ELBOW: usize = 7;
pub const RIGHT_ELBOW: usize = 8;
pub const LEFT_WRIST: usize = 9;
pub const RIGHT_WRIST: usize = 10;

/// Side quality weights. The wrist is the noisiest point.
pub const SHOULDER_WEIGHT: f64 = 0.4;
pub const ELBOW_WEIGHT: f64 = 0.4;
pub const WRIST_WEIGHT: f64 = 0.2;

/// Minimum side quality for a frame to be used
pub const MIN_SIDE_QUALITY: f64 = 0.25;

/// Vectors shorter than this make an angle undefined
pub const MIN_VECTOR_LENGTH: f64 = 1e-6;

/// Default smoothing factor for the elbow angle
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.25;

/// Repetition thresholds in degrees
pub const DOWN_ANGLE: f64 = 110.0;
pub const UP_ANGLE: f64 = 150.0;

/// Consecutive qualifying frames before a phase flip
pub const STABLE_FRAMES: u32 = 2;

/// Minimum time between two counted repetitions
pub const REFRACTORY_MS: u64 = 900;

/// Alarm defaults
pub const DEFAULT_TARGET_REPS: u32 = 10;
pub const DEFAULT_DELAY_SECONDS: u64 = 10;
pub const MIN_DELAY_SECONDS: u64 = 1;
pub const MAX_DELAY_SECONDS: u64 = 366 * 24 * 60 * 60;

/// Capture cadence used when throttling the pose stream
pub const DEFAULT_TARGET_FPS: u32 = 15;
