/// A closed range of floats.
///
/// Used as the hit window during intersection (`surrounds`, exclusive) and
/// for channel clamping on output (`clamp`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The same interval with its upper bound replaced.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Everything strictly past `epsilon`.
    pub fn beyond(epsilon: f32) -> Interval {
        Interval::new(epsilon, f32::INFINITY)
    }

    /// The range of an 8-bit output channel.
    pub const BYTE: Interval = Interval {
        min: 0.0,
        max: 255.0,
    };
}
