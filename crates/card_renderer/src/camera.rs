//! Camera for ray generation.
//!
//! A pinhole basis scaled to pixel size, with a square lens aperture that
//! jitters every ray origin. Averaging many jittered rays gives depth of
//! field and anti-aliasing without a separate blur pass.

use card_math::{unit_or, Ray, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from building a camera basis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Look direction has zero length")]
    ZeroLookDirection,

    #[error("Look direction {look:?} is parallel to world up {world_up:?}")]
    DegenerateBasis { look: Vec3, world_up: Vec3 },
}

/// Fixed camera pose and lens parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Lens center in world space
    pub position: Vec3,
    /// Viewing direction (need not be normalized)
    pub look_direction: Vec3,
    /// Reference up used to build the basis
    pub world_up: Vec3,
    /// World length of one pixel step on the image plane
    pub focal_scale: f32,
    /// Pixel offset from the image plane corner to the optical axis
    pub half_resolution: f32,
    /// Lens jitter extent, in pixel steps
    pub aperture: f32,
    /// Distance scale from the lens to the plane of focus
    pub focal_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 12.0, 8.0),
            look_direction: Vec3::new(0.0, -1.0, 0.0),
            world_up: Vec3::Z,
            focal_scale: 0.002,
            half_resolution: 256.0,
            aperture: 99.0,
            focal_distance: 16.0,
        }
    }
}

/// Camera basis derived once from [`CameraSettings`].
///
/// `up` and `right` are already scaled by `focal_scale`. Following the
/// card's naming, `up` is the horizontal image axis (stepped by `px`) and
/// `right` the vertical one (stepped by `py`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,

    // Direction to pixel (0, 0) before jitter
    plane_offset: Vec3,
    aperture: f32,
    focal_distance: f32,
}

impl Camera {
    /// Build the camera basis by Gram-Schmidt against `world_up`.
    pub fn new(settings: &CameraSettings) -> Result<Self, CameraError> {
        let forward = settings
            .look_direction
            .try_normalize()
            .ok_or(CameraError::ZeroLookDirection)?;

        let degenerate = || CameraError::DegenerateBasis {
            look: settings.look_direction,
            world_up: settings.world_up,
        };
        let up = settings
            .world_up
            .cross(forward)
            .try_normalize()
            .ok_or_else(degenerate)?
            * settings.focal_scale;
        let right = forward
            .cross(up)
            .try_normalize()
            .ok_or_else(degenerate)?
            * settings.focal_scale;

        let plane_offset = (up + right) * -settings.half_resolution + forward;

        Ok(Self {
            origin: settings.position,
            forward,
            up,
            right,
            plane_offset,
            aperture: settings.aperture,
            focal_distance: settings.focal_distance,
        })
    }

    /// Generate a jittered ray through pixel (px, py).
    ///
    /// The origin moves across the lens, the direction moves within the pixel
    /// and is corrected so every lens sample still converges on the focal plane.
    pub fn get_ray(&self, px: u32, py: u32, rng: &mut dyn RngCore) -> Ray {
        let lens = self.up * (gen_f32(rng) - 0.5) * self.aperture
            + self.right * (gen_f32(rng) - 0.5) * self.aperture;

        let pixel = self.up * (gen_f32(rng) + px as f32)
            + self.right * (gen_f32(rng) + py as f32)
            + self.plane_offset;

        let direction = unit_or(-lens + pixel * self.focal_distance, self.forward);
        Ray::new(self.origin + lens, direction)
    }
}

/// Uniform sample in [0, 1).
#[inline]
fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
