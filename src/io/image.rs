//! Target image loading and PNG calendar previews

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use ndarray::Array2;

use crate::calendar::grid::{CountKind, GridState};
use crate::io::configuration::{
    CALENDAR_COLORS, CALENDAR_COLUMNS, CALENDAR_ROWS, LUMA_WEIGHTS, PREVIEW_TILE_PITCH,
    PREVIEW_TILE_SIZE,
};
use crate::io::error::{Result, SynthesisError, file_system_error};
use crate::synthesis::scale::ScaleResolution;

/// Supplies the grayscale samples the calendar should reproduce
pub trait ImageSource {
    /// Grayscale samples indexed `[row, column]`, expected to be 7×54
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be produced
    fn samples(&self) -> Result<Array2<u8>>;
}

impl ImageSource for Array2<u8> {
    fn samples(&self) -> Result<Array2<u8>> {
        Ok(self.clone())
    }
}

/// Image file on disk, resampled to the calendar on load
#[derive(Debug, Clone)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    /// Refer to an image file without decoding it yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the image
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for ImageFile {
    fn samples(&self) -> Result<Array2<u8>> {
        let img = image::open(&self.path).map_err(|e| SynthesisError::ImageLoad {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            width = img.width(),
            height = img.height(),
            "decoded target image"
        );
        Ok(calendar_samples(&img))
    }
}

/// Convert an RGB triple to 8-bit gray with the standard luma weights
pub fn luma(rgb: [u8; 3]) -> u8 {
    let weighted: f64 = rgb
        .iter()
        .zip(LUMA_WEIGHTS)
        .map(|(&channel, weight)| f64::from(channel) * weight)
        .sum();
    weighted.round().clamp(0.0, 255.0) as u8
}

/// Resample an image to the calendar and convert it to grayscale samples
///
/// Images that already match the calendar are sampled as-is; all others are
/// stretched with a bilinear filter.
pub fn calendar_samples(img: &DynamicImage) -> Array2<u8> {
    let columns = CALENDAR_COLUMNS as u32;
    let rows = CALENDAR_ROWS as u32;
    let rgb = if img.width() == columns && img.height() == rows {
        img.to_rgb8()
    } else {
        img.resize_exact(columns, rows, FilterType::Triangle).to_rgb8()
    };

    Array2::from_shape_fn((CALENDAR_ROWS, CALENDAR_COLUMNS), |(row, col)| {
        rgb.get_pixel_checked(col as u32, row as u32)
            .map_or(u8::MAX, |pixel| luma(pixel.0))
    })
}

/// Export one count series of the grid as a PNG calendar
///
/// Each active cell with activity is drawn as a square in the color of its display
/// bin; inert and empty cells stay transparent.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image cannot be
/// saved
pub fn export_calendar_png(
    grid: &GridState,
    resolution: &ScaleResolution,
    kind: CountKind,
    output_path: &Path,
) -> Result<()> {
    let width = PREVIEW_TILE_PITCH * grid.cols() as u32;
    let height = PREVIEW_TILE_PITCH * grid.rows() as u32;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let Some(color) = grid
                .count([row, col], kind)
                .and_then(|count| resolution.display_bin(count))
                .and_then(|bin| CALENDAR_COLORS.get(usize::from(bin)).copied())
            else {
                continue;
            };
            let origin_x = PREVIEW_TILE_PITCH * col as u32;
            let origin_y = PREVIEW_TILE_PITCH * row as u32;
            for y in origin_y..origin_y + PREVIEW_TILE_SIZE {
                for x in origin_x..origin_x + PREVIEW_TILE_SIZE {
                    img.put_pixel(x, y, Rgba(color));
                }
            }
        }
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system_error(parent, "create directory", e))?;
    }

    img.save(output_path)
        .map_err(|e| SynthesisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    tracing::info!(path = %output_path.display(), "wrote calendar preview");
    Ok(())
}
