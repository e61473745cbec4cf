use super::CaptureSource;
use crate::background::decode_rgb;
use crate::error::{Result, StudioError};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Photo uploaded as an encoded file (JPEG/PNG)
pub struct PhotoFile {
    path: PathBuf,
}

impl PhotoFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CaptureSource for PhotoFile {
    fn capture_photo(&mut self) -> Result<RgbImage> {
        let bytes = fs::read(&self.path).map_err(|source| StudioError::Io {
            path: self.path.clone(),
            source,
        })?;

        let photo = decode_rgb(&bytes, "photo")?;
        tracing::debug!("Decoded {} as {}x{}", self.path.display(), photo.width(), photo.height());
        Ok(photo)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
