mod png;

pub use png::{encode_png, PngFileSink, DEFAULT_FILE_NAME};

use crate::error::Result;
use image::{imageops, RgbImage};

/// Trait for output destinations
pub trait OutputSink {
    /// Write a finished image to the output
    fn write_image(&mut self, image: &RgbImage) -> Result<()>;
}

/// Original on the left, result on the right
///
/// The shorter image is centered vertically on a black canvas.
pub fn side_by_side(original: &RgbImage, result: &RgbImage) -> RgbImage {
    let (ow, oh) = original.dimensions();
    let (rw, rh) = result.dimensions();
    let height = oh.max(rh);

    let mut canvas = RgbImage::new(ow + rw, height);
    imageops::replace(&mut canvas, original, 0, ((height - oh) / 2) as i64);
    imageops::replace(&mut canvas, result, ow as i64, ((height - rh) / 2) as i64);
    canvas
}
