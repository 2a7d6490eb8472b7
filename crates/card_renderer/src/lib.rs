//! Card Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for a fixed procedural scene: an infinite
//! checkerboard floor and a grid of mirror spheres packed into a bitmask.
//! Depth of field and anti-aliasing come from jittering every camera ray.

mod bucket;
mod camera;
mod config;
mod hittable;
mod output;
mod renderer;
mod scene;
mod shade;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use camera::{Camera, CameraError, CameraSettings};
pub use config::{ChannelMapping, ConfigError, RenderConfig, DEFAULT_BUCKET_SIZE};
pub use hittable::{Floor, Hit, HitKind, Hittable};
pub use output::{save_image, write_ppm, ImageBuffer, OutputError, PpmError, PpmHeader, Rgb8};
pub use renderer::{pixel_seed, render, render_parallel, render_pixel};
pub use scene::{Scene, SphereGrid, GRID_COLUMNS, GRID_ROWS};
pub use shade::shade;

/// Radiance triple. Not gamma corrected or range limited.
pub type Color = card_math::Vec3;

/// Re-export Vec3 and common math types from card_math
pub use card_math::{Interval, Ray, Vec3};
