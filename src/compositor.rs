use crate::error::{Result, StudioError};
use crate::segmentation::Mask;
use image::{GrayImage, Luma, RgbImage};

/// Mask cut-off: pixels strictly above it keep the photo
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f32);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(0.2);

    pub fn new(value: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(StudioError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Whether a pixel with this foreground probability keeps the photo
    pub fn keeps(self, probability: f32) -> bool {
        probability > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn ensure_same_size(what: &'static str, expected: (u32, u32), actual: (u32, u32)) -> Result<()> {
    if expected != actual {
        return Err(StudioError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Put the person from `image` in front of `background`
///
/// Each output pixel is copied from `image` where the mask is strictly above
/// the threshold and from `background` everywhere else. No blending.
pub fn composite(
    image: &RgbImage,
    mask: &Mask,
    background: &RgbImage,
    threshold: Threshold,
) -> Result<RgbImage> {
    let _span = tracing::debug_span!("composite").entered();

    let dims = image.dimensions();
    ensure_same_size("mask", dims, mask.dimensions())?;
    ensure_same_size("background", dims, background.dimensions())?;

    let output = RgbImage::from_fn(dims.0, dims.1, |x, y| {
        if threshold.keeps(mask.get(x, y)) {
            *image.get_pixel(x, y)
        } else {
            *background.get_pixel(x, y)
        }
    });

    Ok(output)
}

/// Binary keep/replace decision as an image (255 = keep the photo)
pub fn keep_mask(mask: &Mask, threshold: Threshold) -> GrayImage {
    let (width, height) = mask.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if threshold.keeps(mask.get(x, y)) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const PHOTO: Rgb<u8> = Rgb([10, 20, 30]);
    const BACKDROP: Rgb<u8> = Rgb([200, 100, 0]);

    fn gradient_mask(width: u32, height: u32) -> Mask {
        let last = (width * height - 1) as f32;
        Mask::from_fn(width, height, |x, y| (y * width + x) as f32 / last)
    }

    #[test]
    fn threshold_rejects_out_of_range() {
        assert!(Threshold::new(-0.01).is_err());
        assert!(Threshold::new(1.01).is_err());
        assert!(Threshold::new(f32::NAN).is_err());
        assert_eq!(Threshold::new(1.0).unwrap().value(), 1.0);
    }

    #[test]
    fn selects_photo_only_strictly_above_threshold() {
        let image = RgbImage::from_pixel(5, 4, PHOTO);
        let background = RgbImage::from_pixel(5, 4, BACKDROP);
        let mask = gradient_mask(5, 4);

        for t in [0.0, 0.05, 0.2, 0.5, 0.95, 1.0] {
            let threshold = Threshold::new(t).unwrap();
            let output = composite(&image, &mask, &background, threshold).unwrap();
            for (x, y, pixel) in output.enumerate_pixels() {
                let expected = if mask.get(x, y) > t { PHOTO } else { BACKDROP };
                assert_eq!(*pixel, expected, "t={t} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn equal_to_threshold_goes_to_background() {
        let image = RgbImage::from_pixel(1, 1, PHOTO);
        let background = RgbImage::from_pixel(1, 1, BACKDROP);
        let mask = Mask::from_raw(1, 1, vec![0.5]).unwrap();

        let output = composite(&image, &mask, &background, Threshold::new(0.5).unwrap()).unwrap();
        assert_eq!(*output.get_pixel(0, 0), BACKDROP);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let image = RgbImage::from_fn(6, 6, |x, y| Rgb([x as u8 * 40, y as u8 * 40, 7]));
        let background = RgbImage::from_pixel(6, 6, BACKDROP);
        let mask = gradient_mask(6, 6);

        let first = composite(&image, &mask, &background, Threshold::DEFAULT).unwrap();
        let second = composite(&image, &mask, &background, Threshold::DEFAULT).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn mismatched_background_is_rejected() {
        let image = RgbImage::from_pixel(4, 3, PHOTO);
        let background = RgbImage::from_pixel(3, 4, BACKDROP);
        let mask = gradient_mask(4, 3);

        let err = composite(&image, &mask, &background, Threshold::DEFAULT).unwrap_err();
        assert!(matches!(
            err,
            StudioError::DimensionMismatch {
                what: "background",
                expected: (4, 3),
                actual: (3, 4),
            }
        ));
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let image = RgbImage::from_pixel(4, 3, PHOTO);
        let mask = gradient_mask(2, 2);

        let err = composite(&image, &mask, &image, Threshold::DEFAULT).unwrap_err();
        assert!(matches!(err, StudioError::DimensionMismatch { what: "mask", .. }));
    }

    #[test]
    fn keep_mask_matches_composite_decision() {
        let mask = Mask::from_raw(3, 1, vec![0.1, 0.2, 0.9]).unwrap();
        let keep = keep_mask(&mask, Threshold::DEFAULT);
        assert_eq!(keep.as_raw(), &vec![0, 0, 255]);
    }
}
