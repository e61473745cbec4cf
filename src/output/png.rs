use super::OutputSink;
use crate::error::{Result, StudioError};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Name the finished portrait is offered under
pub const DEFAULT_FILE_NAME: &str = "studio_portrait.png";

/// Encode an image as PNG bytes (lossless, default settings)
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let _span = tracing::debug_span!("encode_png").entered();

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(StudioError::Encode)?;
    Ok(buf.into_inner())
}

/// Writes PNG files to a fixed path
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sink writing `studio_portrait.png` inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for PngFileSink {
    fn write_image(&mut self, image: &RgbImage) -> Result<()> {
        let bytes = encode_png(image)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StudioError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, &bytes).map_err(|source| StudioError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!("Wrote {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }
}
