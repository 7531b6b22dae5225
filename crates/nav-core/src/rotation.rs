/// Pair of angular offsets in radians.
///
/// `phi` turns around the camera up axis, `theta` tilts towards it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationDelta {
    pub phi: f64,
    pub theta: f64,
}

impl RotationDelta {
    pub const ZERO: Self = Self {
        phi: 0.0,
        theta: 0.0,
    };

    pub fn new(phi: f64, theta: f64) -> Self {
        Self { phi, theta }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.phi == 0.0 && self.theta == 0.0
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.phi * self.phi + self.theta * self.theta
    }

    pub fn reset(&mut self) {
        *self = Self::ZERO;
    }

    /// Moves towards `target`; `alpha == 1` lands exactly on it.
    pub fn lerp(&mut self, target: &RotationDelta, alpha: f64) {
        self.phi = (1.0 - alpha) * self.phi + alpha * target.phi;
        self.theta = (1.0 - alpha) * self.theta + alpha * target.theta;
    }

    pub fn multiply(&mut self, value: f64) {
        self.phi *= value;
        self.theta *= value;
    }

    /// Zeroes every component whose magnitude does not exceed `value`.
    pub fn threshold(&mut self, value: f64) {
        if self.phi.abs() <= value {
            self.phi = 0.0;
        }
        if self.theta.abs() <= value {
            self.theta = 0.0;
        }
    }

    /// Clamps each component to `[-bound, bound]`.
    pub fn clamped(&self, bound: f64) -> Self {
        Self {
            phi: self.phi.clamp(-bound, bound),
            theta: self.theta.clamp(-bound, bound),
        }
    }
}

impl std::ops::AddAssign for RotationDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.phi += rhs.phi;
        self.theta += rhs.theta;
    }
}
