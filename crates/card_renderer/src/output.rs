//! Image buffer and file output.
//!
//! The native format is a raw binary PPM with the header on one line,
//! `P6 <width> <height> 255 `, followed by RGB bytes in scan order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{ChannelMapping, Color};
use bytemuck::{Pod, Zeroable};
use card_math::Interval;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors from reading a PPM header back.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PpmError {
    #[error("Missing header field: {0}")]
    MissingField(&'static str),

    #[error("Not a binary PPM (magic {0:?})")]
    BadMagic(String),

    #[error("Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// One output pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Convert accumulated color to bytes, truncating toward zero.
    pub fn from_color(color: Color, mapping: ChannelMapping) -> Self {
        Self {
            r: to_channel(color.x, mapping),
            g: to_channel(color.y, mapping),
            b: to_channel(color.z, mapping),
        }
    }
}

#[inline]
fn to_channel(value: f32, mapping: ChannelMapping) -> u8 {
    match mapping {
        ChannelMapping::Clamp => Interval::BYTE.clamp(value) as u8,
        // Low byte of the truncated integer
        ChannelMapping::Wrap => (value as i64) as u8,
    }
}

/// Accumulated pixel colors in output scan order (row 0 written first).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert every pixel to 8-bit RGB.
    pub fn to_rgb8(&self, mapping: ChannelMapping) -> Vec<Rgb8> {
        self.pixels
            .iter()
            .map(|&color| Rgb8::from_color(color, mapping))
            .collect()
    }

    /// Packed RGB bytes, three per pixel.
    pub fn to_bytes(&self, mapping: ChannelMapping) -> Vec<u8> {
        bytemuck::cast_slice::<Rgb8, u8>(&self.to_rgb8(mapping)).to_vec()
    }
}

/// Write an image as a raw binary PPM.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    image: &ImageBuffer,
    mapping: ChannelMapping,
) -> std::io::Result<()> {
    write!(writer, "P6 {} {} 255 ", image.width, image.height)?;
    writer.write_all(bytemuck::cast_slice::<Rgb8, u8>(&image.to_rgb8(mapping)))?;
    writer.flush()
}

/// Save an image, choosing the format from the file extension.
///
/// `.ppm` (or no extension) writes raw PPM; anything else goes through the
/// `image` crate encoders.
pub fn save_image(
    path: impl AsRef<Path>,
    image: &ImageBuffer,
    mapping: ChannelMapping,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        None | Some("ppm") => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(&mut writer, image, mapping)?;
        }
        Some(_) => {
            let buffer =
                image::RgbImage::from_raw(image.width, image.height, image.to_bytes(mapping))
                    .ok_or(OutputError::InvalidDimensions {
                        width: image.width,
                        height: image.height,
                    })?;
            buffer.save(path)?;
        }
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

/// Parsed PPM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpmHeader {
    pub width: u32,
    pub height: u32,
    pub max_value: u32,
    /// Byte offset of the first pixel
    pub data_offset: usize,
}

impl PpmHeader {
    /// Parse the header of a binary PPM stream.
    pub fn parse(bytes: &[u8]) -> Result<Self, PpmError> {
        let mut pos = 0;

        let magic = next_token(bytes, &mut pos).ok_or(PpmError::MissingField("magic"))?;
        if magic != b"P6" {
            return Err(PpmError::BadMagic(
                String::from_utf8_lossy(magic).into_owned(),
            ));
        }

        let width = parse_field(bytes, &mut pos, "width")?;
        let height = parse_field(bytes, &mut pos, "height")?;
        let max_value = parse_field(bytes, &mut pos, "max value")?;

        // Exactly one whitespace byte separates the header from the pixels
        if pos >= bytes.len() {
            return Err(PpmError::MissingField("pixel data"));
        }

        Ok(Self {
            width,
            height,
            max_value,
            data_offset: pos + 1,
        })
    }
}

fn next_token<'a>(bytes: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    let start = *pos;
    while *pos < bytes.len() && !bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    (*pos > start).then(|| &bytes[start..*pos])
}

fn parse_field(bytes: &[u8], pos: &mut usize, field: &'static str) -> Result<u32, PpmError> {
    let token = next_token(bytes, pos).ok_or(PpmError::MissingField(field))?;
    let text = String::from_utf8_lossy(token);
    text.parse().map_err(|_| PpmError::InvalidNumber {
        field,
        value: text.into_owned(),
    })
}
