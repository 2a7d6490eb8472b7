//! Per-pixel sampling and whole-image rendering.
//!
//! Every pixel owns a generator seeded from `(seed, px, py)`, so a given seed
//! renders the same image whether pixels run serially, in parallel buckets,
//! or in any bucket size.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{shade, Camera, Color, ImageBuffer, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Accumulate all samples for pixel (px, py).
///
/// The sum starts at `pixel_bias` and every sample is scaled by
/// `sample_weight`; the result is left unclamped.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    px: u32,
    py: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::splat(config.pixel_bias);

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(px, py, rng);
        pixel_color += shade(scene, &ray, config.max_depth) * config.sample_weight;
    }

    pixel_color
}

/// Seed for the generator of pixel (px, py), a splitmix64 finalizer over the
/// render seed and the pixel coordinates.
pub fn pixel_seed(seed: u64, px: u32, py: u32) -> u64 {
    let mut z = seed ^ ((u64::from(py) << 32) | u64::from(px));
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render the output pixel at column `x`, row `y`.
///
/// Output runs from the highest (px, py) down: row 0 holds `py = height - 1`
/// and column 0 holds `px = width - 1`.
pub(crate) fn render_output_pixel(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    seed: u64,
    x: u32,
    y: u32,
) -> Color {
    let px = config.width - 1 - x;
    let py = config.height - 1 - y;
    let mut rng = StdRng::seed_from_u64(pixel_seed(seed, px, py));
    render_pixel(camera, scene, px, py, config, &mut rng)
}

fn resolve_seed(config: &RenderConfig) -> u64 {
    config.seed.unwrap_or_else(|| {
        let seed = rand::random();
        log::info!("No seed given, using {}", seed);
        seed
    })
}

/// Render the entire scene on the current thread.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let seed = resolve_seed(config);
    let mut image = ImageBuffer::new(config.width, config.height);

    for y in 0..config.height {
        for x in 0..config.width {
            let color = render_output_pixel(camera, scene, config, seed, x, y);
            image.set(x, y, color);
        }
    }

    image
}

/// Render the entire scene with buckets spread over the rayon thread pool.
pub fn render_parallel(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let seed = resolve_seed(config);
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets on {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        total,
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);
    let step = (total / 10).max(1);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, scene, config, seed);

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} finished ({}/{})", bucket.index, finished, total);
            if finished % step == 0 || finished == total {
                log::info!("{}% ({}/{} buckets)", finished * 100 / total, finished, total);
            }

            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}
