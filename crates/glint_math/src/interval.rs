use crate::DVec3;

/// A closed range `[min, max]`, used for color channels and blend factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// The closed unit interval.
    pub const UNIT: Interval = Interval::new(0.0, 1.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive membership test. NaN is never contained.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// True if every component of `v` lies in the interval.
    pub fn contains_vector(&self, v: DVec3) -> bool {
        self.contains(v.x) && self.contains(v.y) && self.contains(v.z)
    }

    /// Clamp `x` into the interval.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}
