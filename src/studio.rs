use crate::background::{BackgroundProvider, BackgroundStyle, BackgroundWarning};
use crate::compositor::{composite, keep_mask, Threshold};
use crate::error::{Result, StudioError};
use crate::segmentation::{Mask, SegmentationModel};
use image::RgbImage;
use std::time::{Duration, Instant};

/// Everything the user picked for one photo
#[derive(Debug, Clone, PartialEq)]
pub struct StudioRequest {
    pub style: BackgroundStyle,
    pub threshold: Threshold,
}

/// Outcome of processing one photo
#[derive(Debug, Clone)]
pub struct StudioResult {
    pub original: RgbImage,
    pub mask: Mask,
    pub output: RgbImage,
    pub warnings: Vec<BackgroundWarning>,
    pub timings: StageTimings,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub segment: Duration,
    pub background: Duration,
    pub composite: Duration,
}

/// Photo -> mask -> background -> composite
///
/// The model and background provider are built once by the caller and
/// borrowed here; nothing else outlives a single `process` call.
pub struct Studio<'a> {
    model: &'a mut dyn SegmentationModel,
    backgrounds: &'a BackgroundProvider,
}

impl<'a> Studio<'a> {
    pub fn new(model: &'a mut dyn SegmentationModel, backgrounds: &'a BackgroundProvider) -> Self {
        Self { model, backgrounds }
    }

    pub fn process(&mut self, photo: RgbImage, request: &StudioRequest) -> Result<StudioResult> {
        let (width, height) = photo.dimensions();
        if width == 0 || height == 0 {
            return Err(StudioError::EmptyImage);
        }
        tracing::info!(
            "Processing {}x{} photo with {} (threshold {:.2})",
            width,
            height,
            request.style,
            request.threshold.value()
        );

        let segment_start = Instant::now();
        let mask = self
            .model
            .segment(&photo)
            .map_err(|e| StudioError::Inference(format!("{:#}", e)))?;
        let segment = segment_start.elapsed();

        let background_start = Instant::now();
        let background = self.backgrounds.resolve(&request.style, &photo)?;
        let background_time = background_start.elapsed();

        let composite_start = Instant::now();
        let output = composite(&photo, &mask, &background.image, request.threshold)?;
        let composite_time = composite_start.elapsed();

        if tracing::enabled!(tracing::Level::DEBUG) {
            let kept = keep_mask(&mask, request.threshold)
                .pixels()
                .filter(|p| p[0] > 0)
                .count();
            tracing::debug!(
                "Kept {:.1}% of the photo",
                100.0 * kept as f64 / (width as f64 * height as f64)
            );
        }

        let timings = StageTimings {
            segment,
            background: background_time,
            composite: composite_time,
        };
        tracing::info!(
            "segment={:.1}ms, background={:.1}ms, composite={:.1}ms",
            timings.segment.as_secs_f64() * 1000.0,
            timings.background.as_secs_f64() * 1000.0,
            timings.composite.as_secs_f64() * 1000.0
        );

        Ok(StudioResult {
            original: photo,
            mask,
            output,
            warnings: background.warning.into_iter().collect(),
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::ImageFetcher;
    use image::Rgb;

    /// Treats the left half of every photo as the person
    struct LeftHalfModel;

    impl SegmentationModel for LeftHalfModel {
        fn segment(&mut self, image: &RgbImage) -> anyhow::Result<Mask> {
            let half = image.width() / 2;
            Ok(Mask::from_fn(image.width(), image.height(), |x, _| {
                if x < half {
                    0.9
                } else {
                    0.1
                }
            }))
        }

        fn input_size(&self) -> (u32, u32) {
            (256, 144)
        }
    }

    struct WrongSizeModel;

    impl SegmentationModel for WrongSizeModel {
        fn segment(&mut self, _image: &RgbImage) -> anyhow::Result<Mask> {
            Ok(Mask::from_fn(1, 1, |_, _| 1.0))
        }

        fn input_size(&self) -> (u32, u32) {
            (1, 1)
        }
    }

    struct NoNetwork;

    impl ImageFetcher for NoNetwork {
        fn fetch(&self, _url: &str) -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("network disabled in tests")
        }
    }

    fn request(style: BackgroundStyle) -> StudioRequest {
        StudioRequest {
            style,
            threshold: Threshold::DEFAULT,
        }
    }

    #[test]
    fn green_screen_replaces_right_half() {
        let mut model = LeftHalfModel;
        let provider = BackgroundProvider::new(Box::new(NoNetwork));
        let mut studio = Studio::new(&mut model, &provider);

        let photo = RgbImage::from_pixel(4, 2, Rgb([50, 60, 70]));
        let result = studio
            .process(photo, &request(BackgroundStyle::GreenScreen))
            .unwrap();

        assert_eq!(*result.output.get_pixel(0, 0), Rgb([50, 60, 70]));
        assert_eq!(*result.output.get_pixel(3, 1), Rgb([0, 255, 0]));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn warnings_are_passed_through() {
        let mut model = LeftHalfModel;
        let provider = BackgroundProvider::new(Box::new(NoNetwork));
        let mut studio = Studio::new(&mut model, &provider);

        let result = studio
            .process(
                RgbImage::new(2, 2),
                &request(BackgroundStyle::Custom { upload: None }),
            )
            .unwrap();
        assert_eq!(result.warnings, vec![BackgroundWarning::MissingCustomUpload]);
    }

    #[test]
    fn model_returning_wrong_size_is_caught() {
        let mut model = WrongSizeModel;
        let provider = BackgroundProvider::new(Box::new(NoNetwork));
        let mut studio = Studio::new(&mut model, &provider);

        let err = studio
            .process(RgbImage::new(3, 3), &request(BackgroundStyle::GreenScreen))
            .unwrap_err();
        assert!(matches!(err, StudioError::DimensionMismatch { what: "mask", .. }));
    }

    #[test]
    fn empty_photo_is_rejected() {
        let mut model = LeftHalfModel;
        let provider = BackgroundProvider::new(Box::new(NoNetwork));
        let mut studio = Studio::new(&mut model, &provider);

        let err = studio
            .process(RgbImage::new(0, 0), &request(BackgroundStyle::GreenScreen))
            .unwrap_err();
        assert!(matches!(err, StudioError::EmptyImage));
    }
}
