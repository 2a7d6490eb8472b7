use crate::Vec3;

/// Normalize `v`, falling back to `fallback` when `v` has no direction.
///
/// A zero or non-finite length is a caller bug: debug builds panic on it,
/// release builds return `fallback` instead of letting NaN reach the image.
#[inline]
pub fn unit_or(v: Vec3, fallback: Vec3) -> Vec3 {
    debug_assert!(
        v.length_squared() > 0.0 && v.is_finite(),
        "normalizing a degenerate vector {v:?}"
    );
    v.try_normalize().unwrap_or(fallback)
}
