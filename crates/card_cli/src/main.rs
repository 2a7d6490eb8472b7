//! Command-line front end: parse options, render, write the image.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use card_renderer::{
    render, render_parallel, save_image, write_ppm, Camera, ChannelMapping, RenderConfig, Scene,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "card", author, version, about = "Path trace the business card scene")]
struct Cli {
    /// JSON render configuration; flags below override its fields
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Maximum ray segments per camera ray
    #[arg(long)]
    max_depth: Option<u32>,

    /// Random seed; omit for a different image every run
    #[arg(long)]
    seed: Option<u64>,

    /// Output file (.ppm or any format the image crate knows); "-" writes PPM to stdout
    #[arg(short, long, default_value = "card.ppm")]
    output: PathBuf,

    /// Worker threads (defaults to all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Render on the main thread only
    #[arg(long)]
    single_threaded: bool,

    /// Keep the low byte of out-of-range channels instead of clamping
    #[arg(long)]
    wrap_channels: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.wrap_channels {
            config.channel_mapping = ChannelMapping::Wrap;
        }

        config.validate().context("Invalid render settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = cli.render_config()?;
    if config.channel_mapping == ChannelMapping::Wrap {
        log::warn!("Channels above 255 will wrap around");
    }

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let camera = Camera::new(&config.camera).context("Invalid camera settings")?;
    let scene = Scene::default();
    log::info!(
        "Scene: {} spheres, light at {:?}",
        scene.grid.count(),
        scene.light_position
    );

    let image = if cli.single_threaded {
        log::info!(
            "Rendering {}x{} @ {} spp on one thread",
            config.width,
            config.height,
            config.samples_per_pixel
        );
        let start = std::time::Instant::now();
        let image = render(&camera, &scene, &config);
        log::info!("Rendered in {:?}", start.elapsed());
        image
    } else {
        render_parallel(&camera, &scene, &config)
    };

    if cli.output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        write_ppm(&mut writer, &image, config.channel_mapping)
            .context("Failed to write image to stdout")?;
    } else {
        save_image(&cli.output, &image, config.channel_mapping)
            .with_context(|| format!("Failed to save {}", cli.output.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "card",
            "--width",
            "8",
            "--height",
            "6",
            "-s",
            "1",
            "--seed",
            "42",
            "--wrap-channels",
        ]);
        let config = cli.render_config().unwrap();

        assert_eq!((config.width, config.height), (8, 6));
        assert_eq!(config.samples_per_pixel, 1);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.channel_mapping, ChannelMapping::Wrap);
        assert_eq!(cli.output, PathBuf::from("card.ppm"));
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = Cli::parse_from(["card", "--width", "0"]);
        assert!(cli.render_config().is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("card_cli_test_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"width": 32, "height": 16, "samples_per_pixel": 4}"#).unwrap();

        let cli = Cli::parse_from([
            "card",
            "--config",
            path.to_str().unwrap(),
            "--height",
            "24",
        ]);
        let config = cli.render_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((config.width, config.height), (32, 24));
        assert_eq!(config.samples_per_pixel, 4);
        assert_eq!(config.seed, None);
    }
}
