// Re-export glam for convenience
pub use glam::*;

// Card math types
mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::unit_or;
