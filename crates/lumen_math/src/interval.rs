/// A closed range of ray parameters (or of one AABB axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Every parameter value.
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Interval `[min, max]`.
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[min, +inf)`, the usual range for primary and reflected rays.
    #[inline]
    pub const fn from_min(min: f64) -> Self {
        Self::new(min, f64::INFINITY)
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// `min <= x <= max`
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Same lower bound, upper bound pulled in to `max`.
    ///
    /// Used by nearest-hit searches to shrink the range after each hit.
    #[inline]
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// Grow by `delta / 2` on each side.
    pub fn expand(&self, delta: f64) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Smallest interval enclosing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
