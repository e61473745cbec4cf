mod color;
mod fetch;
pub mod style;

pub use color::parse_hex_color;
pub use fetch::{fetch_with_retry, HttpFetcher, ImageFetcher};
pub use style::{BackgroundStyle, BlurStrength, StockScene, StyleName, Theme};

use crate::error::{Result, StudioError};
use image::{imageops, Rgb, RgbImage};
use std::fmt;

/// Non-fatal problems the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundWarning {
    /// Custom style picked without an uploaded image
    MissingCustomUpload,
    /// Stock scene with no artwork behind it
    SceneUnavailable(StockScene),
}

impl fmt::Display for BackgroundWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundWarning::MissingCustomUpload => {
                f.write_str("Please upload a background image; using black instead")
            }
            BackgroundWarning::SceneUnavailable(scene) => {
                write!(f, "No image is available for {}; using black instead", scene.label())
            }
        }
    }
}

/// A resolved backdrop, always the size of the photo it was made for
#[derive(Debug, Clone)]
pub struct Background {
    pub image: RgbImage,
    pub warning: Option<BackgroundWarning>,
}

impl Background {
    fn new(image: RgbImage) -> Self {
        Self {
            image,
            warning: None,
        }
    }

    fn black(width: u32, height: u32, warning: BackgroundWarning) -> Self {
        tracing::warn!("{}", warning);
        Self {
            image: RgbImage::new(width, height),
            warning: Some(warning),
        }
    }
}

/// Turns a `BackgroundStyle` into a backdrop image
pub struct BackgroundProvider {
    fetcher: Box<dyn ImageFetcher>,
    retries: u32,
}

impl BackgroundProvider {
    pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    pub fn new(fetcher: Box<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            retries: 1,
        }
    }

    /// Resolve `style` into an image matching `photo`'s dimensions
    pub fn resolve(&self, style: &BackgroundStyle, photo: &RgbImage) -> Result<Background> {
        let _span = tracing::debug_span!("background").entered();
        let (width, height) = photo.dimensions();

        let background = match style {
            BackgroundStyle::Blur { strength } => {
                tracing::debug!(
                    "Blurring photo with kernel {} (sigma {:.2})",
                    strength.kernel_size(),
                    strength.sigma()
                );
                Background::new(imageops::blur(photo, strength.sigma()))
            }
            BackgroundStyle::SolidColor(color) => {
                Background::new(RgbImage::from_pixel(width, height, *color))
            }
            BackgroundStyle::GreenScreen => {
                Background::new(RgbImage::from_pixel(width, height, Self::GREEN))
            }
            BackgroundStyle::Custom { upload: Some(bytes) } => {
                let image = decode_rgb(bytes, "custom background")?;
                Background::new(stretch(&image, width, height))
            }
            BackgroundStyle::Custom { upload: None } => {
                Background::black(width, height, BackgroundWarning::MissingCustomUpload)
            }
            BackgroundStyle::Stock(scene) => match scene.url() {
                Some(url) => {
                    tracing::info!("Fetching {} from {}", scene.label(), url);
                    let bytes = fetch_with_retry(self.fetcher.as_ref(), url, self.retries)?;
                    let image = decode_rgb(&bytes, "stock background")?;
                    Background::new(stretch(&image, width, height))
                }
                None => Background::black(width, height, BackgroundWarning::SceneUnavailable(*scene)),
            },
        };

        Ok(background)
    }
}

/// Decode encoded image bytes into RGB, rejecting empty images
pub fn decode_rgb(bytes: &[u8], what: &'static str) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| StudioError::Decode { what, source })?
        .into_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(StudioError::EmptyImage);
    }
    Ok(image)
}

/// Resize to exactly `width` x `height`, ignoring aspect ratio
fn stretch(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, imageops::FilterType::CatmullRom)
}
