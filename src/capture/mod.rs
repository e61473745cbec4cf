mod file;
#[cfg(feature = "camera")]
mod webcam;

pub use file::PhotoFile;
#[cfg(feature = "camera")]
pub use webcam::WebcamCapture;

use crate::error::Result;
use image::RgbImage;

/// Where the photo of the person comes from
pub trait CaptureSource {
    /// Produce the single photo to process
    fn capture_photo(&mut self) -> Result<RgbImage>;

    /// Short description for logs
    fn describe(&self) -> String;
}
