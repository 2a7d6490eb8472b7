//! Radiance estimate along a single ray.
//!
//! Sky is a horizon gradient, the floor is a shadow-tested checkerboard and
//! spheres are mirrors with a hard specular highlight. Mirror bounces are
//! followed in a loop carrying the accumulated attenuation.

use crate::{Color, HitKind, Scene};
use card_math::{unit_or, Ray, Vec3};

/// Compute the color seen by a ray.
///
/// `max_depth` bounds the number of ray segments traced; whatever a path
/// would gather past that many mirror bounces is dropped. The direction must
/// be unit length.
pub fn shade(scene: &Scene, ray: &Ray, max_depth: u32) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = 1.0;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let hit = scene.intersect(&ray);

        match hit.kind {
            HitKind::Sky => {
                return radiance + throughput * scene.sky_color(ray.direction);
            }
            HitKind::Floor => {
                let point = ray.at(hit.distance);
                let (_, diffuse) = direct_light(scene, point, hit.normal);
                let albedo = scene.floor_albedo(point);
                let light = diffuse * scene.diffuse_weight + scene.ambient;
                return radiance + throughput * albedo * light;
            }
            HitKind::Sphere => {
                let point = ray.at(hit.distance);
                let (to_light, diffuse) = direct_light(scene, point, hit.normal);
                let reflected =
                    ray.direction - hit.normal * (2.0 * hit.normal.dot(ray.direction));

                let specular = if diffuse > 0.0 {
                    to_light
                        .dot(reflected)
                        .max(0.0)
                        .powi(scene.specular_exponent)
                } else {
                    0.0
                };

                radiance += throughput * Color::splat(specular);
                throughput *= scene.bounce_attenuation;
                ray = Ray::new(point, reflected);
            }
        }
    }

    radiance
}

/// Unit direction to the light and the clamped Lambert term at a surface point.
///
/// Hard shadow: anything between the point and the light zeroes the term.
fn direct_light(scene: &Scene, point: Vec3, normal: Vec3) -> (Vec3, f32) {
    let to_light = unit_or(scene.light_position - point, Vec3::Z);
    let mut diffuse = to_light.dot(normal).max(0.0);
    if diffuse > 0.0 && scene.occluded(point, to_light) {
        diffuse = 0.0;
    }
    (to_light, diffuse)
}
