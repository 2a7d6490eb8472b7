use crate::Vec3;

/// A ray in 3D space with origin and direction.
///
/// The shading code assumes `direction` is unit length (the specular power
/// term and the sphere quadratic both depend on it). Nothing here enforces
/// that; callers normalize before tracing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + direction * t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
