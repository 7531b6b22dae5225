// Navigation tuning constants shared by every state variant.

// Transition progress added per frame at 60 fps with speed coefficient 1
pub const ANIMATION_SPEED: f64 = 1.0 / 40.0;
pub const REFERENCE_FPS: f64 = 60.0;

// Distance from the camera center to the look-at point (local units)
pub const LOOKAT_DEPTH: f64 = 10.0;

// Zoom is an exponent: the view is magnified by 2^zoom
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_SNAP: f64 = 2e-3; // minimum step and snap distance
pub const ZOOM_RATE: f64 = 5.0;

// Look-at interpolation
pub const LOOKAT_RATE: f64 = 5.0;
pub const LOOKAT_SNAP_SQUARED: f64 = 1e-6;

// Re-anchor the local frame once the current node drifts this far (degrees)
pub const REFERENCE_THRESHOLD: f64 = 0.01;

// 50 km/h covers roughly 28 m in two seconds
pub const MAX_MOTION_DISTANCE: f64 = 25.0;

// Rotation smoothing
pub const ROTATION_ACCELERATION: f64 = 0.86; // per-frame decay of applied rotation
pub const ROTATION_INCREASE_ALPHA: f64 = 0.97;
pub const ROTATION_DECREASE_ALPHA: f64 = 0.9;
pub const ROTATION_THRESHOLD: f64 = 1e-3;
pub const UNBOUNDED_ROTATION_ALPHA: f64 = 0.8;

// Per-axis bounds, divided by 2^zoom
pub const BASIC_ROTATION_BOUND: f64 = 0.05;
pub const ANGULAR_BOUND_DIVISOR: f64 = 10.0; // pi / (10 * 2^zoom)

// Keeps the polar angle away from the up axis singularities
pub const POLAR_MARGIN: f64 = 0.1;

// Full panoramas never center closer than this to the poles (basic y)
pub const FULL_PANO_Y_MARGIN: f64 = 0.05;

// Traversal speed coefficient range
pub const MIN_SPEED: f64 = 0.0;
pub const MAX_SPEED: f64 = 10.0;

// Ease-in/ease-out for trajectories shorter than this
pub const BEZIER_TRAJECTORY_LENGTH: usize = 3;
pub const BEZIER_CONTROL_POINTS: [f32; 4] = [0.74, 0.67, 0.38, 0.96];

// Earth mode
pub const EARTH_PULL_BACK: f64 = 16.0;
pub const EARTH_LIFT: f64 = 20.0;
pub const MIN_DOLLY_DISTANCE: f64 = 1.0;
pub const MAX_DOLLY_DISTANCE: f64 = 1000.0;

// Basic coordinate of the image center
pub const BASIC_CENTER: [f64; 2] = [0.5, 0.5];
