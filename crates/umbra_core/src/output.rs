//! Image sinks.
//!
//! Pixels arrive as row-major RGB triples with the top row first.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Output container, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Plain-text P3 PPM
    Ppm,
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Pick a format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "ppm" => Ok(ImageFormat::Ppm),
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(CoreError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn check_pixel_count(width: u32, height: u32, pixels: &[[u8; 3]]) -> CoreResult<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(CoreError::PixelCount {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Write pixels as a plain-text P3 PPM.
///
/// Header is `P3\n<width> <height>\n255\n`, followed by one `r g b` line
/// per pixel.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> CoreResult<()> {
    check_pixel_count(width, height, pixels)?;

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    for [r, g, b] in pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Save pixels to `path`, encoding by extension (`.ppm`, `.png`, `.jpg`).
pub fn save_image(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> CoreResult<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    check_pixel_count(width, height, pixels)?;

    match format {
        ImageFormat::Ppm => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(&mut writer, width, height, pixels)?;
            writer.flush()?;
        }
        ImageFormat::Png | ImageFormat::Jpeg => {
            let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
            // Length was checked above, so from_raw cannot fail here
            let buffer = image::RgbImage::from_raw(width, height, raw).ok_or(
                CoreError::PixelCount {
                    expected: width as usize * height as usize,
                    actual: pixels.len(),
                },
            )?;
            buffer.save(path)?;
        }
    }

    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
