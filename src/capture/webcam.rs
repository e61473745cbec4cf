use super::CaptureSource;
use crate::error::{Result, StudioError};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// Grabs one still from a webcam
pub struct WebcamCapture {
    index: u32,
    camera: Camera,
}

impl WebcamCapture {
    pub fn new(device_index: u32) -> Result<Self> {
        tracing::info!("Initializing webcam {}", device_index);

        let index = CameraIndex::Index(device_index);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let camera = Camera::new(index, requested)
            .map_err(|e| StudioError::Capture(format!("failed to open camera: {}", e)))?;

        Ok(Self {
            index: device_index,
            camera,
        })
    }
}

impl CaptureSource for WebcamCapture {
    fn capture_photo(&mut self) -> Result<RgbImage> {
        self.camera
            .open_stream()
            .map_err(|e| StudioError::Capture(format!("failed to open camera stream: {}", e)))?;

        let frame = self
            .camera
            .frame()
            .map_err(|e| StudioError::Capture(format!("failed to capture frame: {}", e)));

        // Release the device even when the grab failed
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!("Failed to stop camera stream: {}", e);
        }

        let photo = frame?
            .decode_image::<RgbFormat>()
            .map_err(|e| StudioError::Capture(format!("failed to decode frame: {}", e)))?;

        if photo.width() == 0 || photo.height() == 0 {
            return Err(StudioError::EmptyImage);
        }
        Ok(photo)
    }

    fn describe(&self) -> String {
        format!("webcam {}", self.index)
    }
}
