use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::geometry::{Homography, TargetRectangle};

/// Colour given to destination pixels whose source lies outside the image
pub const BORDER_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Sampling kernel used when a destination pixel maps between source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

impl Interpolation {
    /// How far outside the source a coordinate may fall and still touch a real pixel
    fn reach(&self) -> f64 {
        match self {
            Interpolation::Nearest => 0.5,
            Interpolation::Bilinear => 1.0,
            Interpolation::Bicubic => 2.0,
        }
    }
}

/// Source pixel at integer coordinates, or the fill colour outside the image
fn fetch(img: &RgbImage, px: i64, py: i64, fill: [f64; 3]) -> [f64; 3] {
    let (width, height) = img.dimensions();
    if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
        return fill;
    }
    let pixel = img.get_pixel(px as u32, py as u32);
    [pixel[0] as f64, pixel[1] as f64, pixel[2] as f64]
}

fn nearest_interpolate(img: &RgbImage, x: f64, y: f64, fill: [f64; 3]) -> [f64; 3] {
    fetch(img, x.round() as i64, y.round() as i64, fill)
}

/// Tent kernel, support radius 1
fn linear_kernel(d: f64) -> f64 {
    (1.0 - d.abs()).max(0.0)
}

/// Catmull-Rom cubic (a = -0.5), support radius 2
fn catmull_rom_kernel(d: f64) -> f64 {
    let d = d.abs();
    if d < 1.0 {
        (1.5 * d - 2.5) * d * d + 1.0
    } else if d < 2.0 {
        ((-0.5 * d + 2.5) * d - 4.0) * d + 2.0
    } else {
        0.0
    }
}

/// Separable convolution of the source around (x, y).
///
/// Taps run from floor - radius + 1 to floor + radius in each axis; taps
/// outside the image contribute `fill`.
fn separable_sample(
    img: &RgbImage,
    x: f64,
    y: f64,
    fill: [f64; 3],
    radius: i64,
    kernel: fn(f64) -> f64,
) -> [f64; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let mut result = [0.0; 3];

    for py in (y0 - radius + 1)..=(y0 + radius) {
        let wy = kernel(y - py as f64);
        if wy == 0.0 {
            continue;
        }
        for px in (x0 - radius + 1)..=(x0 + radius) {
            let weight = wy * kernel(x - px as f64);
            if weight == 0.0 {
                continue;
            }
            let pixel = fetch(img, px, py, fill);
            for c in 0..3 {
                result[c] += pixel[c] * weight;
            }
        }
    }

    result
}

fn to_pixel(value: [f64; 3]) -> Rgb<u8> {
    Rgb(value.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

/// Warp `img` through `homography` into a new image of the target size.
///
/// Every destination pixel (x, y) is pulled from the source location the
/// inverse homography sends it to. Destination pixels whose source falls
/// outside the image get `fill`; near the edge the kernel blends with it.
pub fn warp_perspective(
    img: &RgbImage,
    homography: &Homography,
    target: TargetRectangle,
    interpolation: Interpolation,
    fill: Rgb<u8>,
) -> Result<RgbImage> {
    let (src_width, src_height) = img.dimensions();
    let inverse = homography.inverse()?;
    let fill_value = [fill[0] as f64, fill[1] as f64, fill[2] as f64];
    let reach = interpolation.reach();

    let mut output = RgbImage::from_pixel(target.width, target.height, fill);

    for out_y in 0..target.height {
        for out_x in 0..target.width {
            let Some((src_x, src_y)) = inverse.map(out_x as f64, out_y as f64) else {
                continue;
            };

            if !(src_x > -reach
                && src_x < src_width as f64 - 1.0 + reach
                && src_y > -reach
                && src_y < src_height as f64 - 1.0 + reach)
            {
                continue;
            }

            let value = match interpolation {
                Interpolation::Nearest => nearest_interpolate(img, src_x, src_y, fill_value),
                Interpolation::Bilinear => {
                    separable_sample(img, src_x, src_y, fill_value, 1, linear_kernel)
                }
                Interpolation::Bicubic => {
                    separable_sample(img, src_x, src_y, fill_value, 2, catmull_rom_kernel)
                }
            };
            output.put_pixel(out_x, out_y, to_pixel(value));
        }
    }

    Ok(output)
}
