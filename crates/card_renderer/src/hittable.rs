//! Hittable trait and Hit record for ray-scene intersection.

use crate::{Scene, SphereGrid};
use card_math::{unit_or, Interval, Ray, Vec3};

/// What a ray struck first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Nothing; the ray escapes
    Sky,
    /// The ground plane
    Floor,
    /// One of the grid spheres
    Sphere,
}

/// Result of an intersection query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: HitKind,
    /// Ray parameter of the hit; `+inf` for sky
    pub distance: f32,
    /// Plane normal for the floor, outward surface normal for a sphere
    pub normal: Vec3,
}

impl Hit {
    /// The "no hit" result.
    pub const SKY: Hit = Hit {
        kind: HitKind::Sky,
        distance: f32::INFINITY,
        normal: Vec3::ZERO,
    };

    /// Returns true if the ray struck geometry.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.kind != HitKind::Sky
    }
}

/// Trait for scene primitives that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest hit with a ray parameter strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit>;
}

/// The infinite ground plane z = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Floor;

impl Hittable for Floor {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        // Parallel rays give +-inf or NaN here, which never pass the window test.
        let t = -ray.origin.z / ray.direction.z;
        ray_t.surrounds(t).then_some(Hit {
            kind: HitKind::Floor,
            distance: t,
            normal: Vec3::Z,
        })
    }
}

impl Hittable for SphereGrid {
    /// Brute-force scan of every occupied cell.
    ///
    /// Assumes a unit-length direction. Only the near root is tested, so a
    /// ray leaving a sphere from the inside does not hit it again.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut window = ray_t;

        for (row, col) in self.cells() {
            let oc = ray.origin - self.center(row, col);
            let b = oc.dot(ray.direction);
            let q = b * b - (oc.dot(oc) - self.radius_squared);
            if q <= 0.0 {
                continue;
            }

            let s = -(b + q.sqrt());
            if window.surrounds(s) {
                window = window.with_max(s);
                closest = Some(Hit {
                    kind: HitKind::Sphere,
                    distance: s,
                    normal: unit_or(oc + ray.direction * s, Vec3::Z),
                });
            }
        }

        closest
    }
}

impl Scene {
    /// Find the nearest surface along a ray.
    ///
    /// The floor is tested first and the spheres only replace it when strictly
    /// closer, so on exact ties the floor (then the earlier cell) wins.
    pub fn intersect(&self, ray: &Ray) -> Hit {
        let window = Interval::beyond(self.epsilon);
        let mut best = Hit::SKY;

        if let Some(hit) = self.floor.hit(ray, window) {
            best = hit;
        }
        if let Some(hit) = self.grid.hit(ray, window.with_max(best.distance)) {
            best = hit;
        }

        best
    }

    /// Returns true if anything blocks the ray from `point` along `direction`.
    pub fn occluded(&self, point: Vec3, direction: Vec3) -> bool {
        self.intersect(&Ray::new(point, direction)).is_hit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GRID_ROWS;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn two_sphere_grid() -> SphereGrid {
        let mut rows = [0; GRID_ROWS];
        rows[0] = 0b11;
        SphereGrid::new(rows)
    }

    #[test]
    fn test_floor_hit_from_above() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = Floor.hit(&ray, Interval::beyond(0.01)).unwrap();

        assert_eq!(hit.kind, HitKind::Floor);
        assert_eq!(hit.distance, 3.0);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_floor_miss_looking_up_or_parallel() {
        let window = Interval::beyond(0.01);

        let up = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        assert!(Floor.hit(&up, window).is_none());

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::X);
        assert!(Floor.hit(&parallel, window).is_none());

        let on_plane = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(Floor.hit(&on_plane, window).is_none());
    }

    #[test]
    fn test_floor_ignores_hits_inside_epsilon() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.005), Vec3::new(0.0, 0.0, -1.0));
        assert!(Floor.hit(&ray, Interval::beyond(0.01)).is_none());
    }

    #[test]
    fn test_sphere_nearest_wins() {
        let grid = two_sphere_grid();
        let window = Interval::beyond(0.01);

        // Travelling +x along the row: cell (0, 0) at x = 0 comes first
        let radius = grid.radius_squared.sqrt();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 4.0), Vec3::X);
        let hit = grid.hit(&ray, window).unwrap();
        assert_eq!(hit.kind, HitKind::Sphere);
        assert!((hit.distance - (5.0 - radius)).abs() < 1e-5);
        assert!(approx_eq(hit.normal, -Vec3::X));

        // Travelling -x: cell (0, 1) at x = 1 comes first
        let ray = Ray::new(Vec3::new(6.0, 0.0, 4.0), -Vec3::X);
        let hit = grid.hit(&ray, window).unwrap();
        assert!((hit.distance - (5.0 - radius)).abs() < 1e-5);
        assert!(approx_eq(hit.normal, Vec3::X));
    }

    #[test]
    fn test_sphere_miss() {
        let grid = two_sphere_grid();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 4.0), -Vec3::X);
        assert!(grid.hit(&ray, Interval::beyond(0.01)).is_none());

        let empty = SphereGrid::empty();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 4.0), Vec3::X);
        assert!(empty.hit(&ray, Interval::beyond(0.01)).is_none());
    }

    #[test]
    fn test_sphere_respects_window_max() {
        let grid = two_sphere_grid();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 4.0), Vec3::X);
        assert!(grid.hit(&ray, Interval::new(0.01, 3.0)).is_none());
    }

    #[test]
    fn test_scene_sky() {
        let scene = Scene::default();
        let hit = scene.intersect(&Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z));
        assert_eq!(hit, Hit::SKY);
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_scene_sphere_beats_farther_floor() {
        let scene = Scene::with_grid(two_sphere_grid());

        // Straight down onto the top of sphere (0, 0); floor is further away
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let hit = scene.intersect(&ray);
        assert_eq!(hit.kind, HitKind::Sphere);
        let top = scene.grid.center(0, 0).z + scene.grid.radius_squared.sqrt();
        assert!((hit.distance - (10.0 - top)).abs() < 1e-5);
        assert!(approx_eq(hit.normal, Vec3::Z));
    }

    #[test]
    fn test_scene_floor_beats_farther_sphere() {
        let scene = Scene::with_grid(two_sphere_grid());

        // Looking down and away from the spheres
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.6, -0.8));
        let hit = scene.intersect(&ray);
        assert_eq!(hit.kind, HitKind::Floor);
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_occluded() {
        let scene = Scene::with_grid(two_sphere_grid());

        // Below sphere (0, 0) looking up at it
        assert!(scene.occluded(Vec3::new(0.0, 0.0, 0.0), Vec3::Z));
        // Looking up next to the spheres
        assert!(!scene.occluded(Vec3::new(5.0, 0.0, 0.0), Vec3::Z));
    }
}
