use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbImage};

use crate::error::{RectifyError, Result};
use crate::geometry::{CornerSet, Homography, TargetRectangle};
use crate::transform::{warp_perspective, Interpolation, BORDER_FILL};

/// Knobs that do not change the output size or corner semantics
#[derive(Debug, Clone, Copy, Default)]
pub struct RectifyOptions {
    pub interpolation: Interpolation,
}

/// Output format implied by the path's extension
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(path)
        .ok()
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| RectifyError::UnsupportedOutputFormat(path.to_path_buf()))
}

/// Encode in memory first so a rejected colour type never leaves a partial file
fn write_image(img: &RgbImage, path: &Path, format: ImageFormat) -> Result<()> {
    let write_error = |source| RectifyError::ImageWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut encoded = Cursor::new(Vec::new());
    img.write_to(&mut encoded, format).map_err(write_error)?;
    fs::write(path, encoded.into_inner())
        .map_err(|e| write_error(image::ImageError::IoError(e)))
}

/// Flatten the quadrilateral `corners` of the image at `image_path` into a
/// 1050x1400 rectangle and write it to `output_path`.
///
/// Returns the output path on success.
pub fn rectify(
    image_path: &Path,
    corners: &CornerSet,
    output_path: &Path,
    options: &RectifyOptions,
) -> Result<PathBuf> {
    let img = ImageReader::open(image_path)
        .map_err(|e| RectifyError::ImageLoad {
            path: image_path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .with_guessed_format()
        .map_err(|e| RectifyError::ImageLoad {
            path: image_path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?
        .decode()
        .map_err(|source| RectifyError::ImageLoad {
            path: image_path.to_path_buf(),
            source,
        })?;

    log::info!(
        "Loaded image: {:?} ({}x{})",
        image_path,
        img.width(),
        img.height()
    );

    let format = output_format(output_path)?;
    let target = TargetRectangle::CANONICAL;
    corners.check_non_degenerate()?;
    let homography = Homography::from_correspondences(corners, &target.corners())?;
    log::debug!("Homography:\n{}", homography);

    let rgb = img.to_rgb8();
    drop(img);
    let warped = warp_perspective(
        &rgb,
        &homography,
        target,
        options.interpolation,
        BORDER_FILL,
    )?;

    write_image(&warped, output_path, format)?;

    log::info!(
        "Saved rectified image: {:?} ({}x{})",
        output_path,
        warped.width(),
        warped.height()
    );

    Ok(output_path.to_path_buf())
}
