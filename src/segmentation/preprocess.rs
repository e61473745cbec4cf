use super::types::Mask;
use crate::error::{Result, StudioError};
use image::{imageops, ImageBuffer, Luma, RgbImage};
use ndarray::{Array4, ArrayViewD};

/// Memory layout of the model's image tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TensorLayout {
    /// [1, height, width, 3]
    #[default]
    Nhwc,
    /// [1, 3, height, width]
    Nchw,
}

/// Preprocessor for converting RGB images to model input tensors
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
    layout: TensorLayout,
}

impl Preprocessor {
    pub fn new(target_width: u32, target_height: u32, layout: TensorLayout) -> Self {
        Self {
            target_width,
            target_height,
            layout,
        }
    }

    /// Preprocess an RGB image into a normalized tensor
    ///
    /// Steps:
    /// 1. Resize to target dimensions
    /// 2. Convert to float and normalize to [0, 1]
    /// 3. Lay out as NHWC or NCHW
    pub fn preprocess(&self, image: &RgbImage) -> Array4<f32> {
        let _span = tracing::debug_span!("preprocess").entered();

        let resized = if image.dimensions() != (self.target_width, self.target_height) {
            imageops::resize(
                image,
                self.target_width,
                self.target_height,
                imageops::FilterType::Lanczos3,
            )
        } else {
            image.clone()
        };

        let (width, height) = resized.dimensions();
        let (h, w) = (height as usize, width as usize);
        let mut tensor = match self.layout {
            TensorLayout::Nhwc => Array4::<f32>::zeros((1, h, w, 3)),
            TensorLayout::Nchw => Array4::<f32>::zeros((1, 3, h, w)),
        };

        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                let value = pixel[c] as f32 / 255.0;
                match self.layout {
                    TensorLayout::Nhwc => tensor[[0, y, x, c]] = value,
                    TensorLayout::Nchw => tensor[[0, c, y, x]] = value,
                }
            }
        }

        tensor
    }

    /// Pull the person probability map out of a raw model output
    ///
    /// Accepts [h, w], [1, h, w], [1, h, w, C] and [1, C, h, w]. With more than
    /// one channel the last one is taken as the person class.
    pub fn extract_probabilities(output: ArrayViewD<'_, f32>) -> Result<(u32, u32, Vec<f32>)> {
        let shape = output.shape().to_vec();
        let (height, width, channels, channels_last) = match shape.as_slice() {
            [h, w] => (*h, *w, 1, true),
            [1, h, w] => (*h, *w, 1, true),
            [1, c, h, w] if *c <= 2 && *w > 2 => (*h, *w, *c, false),
            [1, h, w, c] if *c <= 2 => (*h, *w, *c, true),
            [1, c, h, w] if *c <= 2 => (*h, *w, *c, false),
            _ => {
                return Err(StudioError::Inference(format!(
                    "unexpected mask shape {:?}",
                    shape
                )))
            }
        };

        let output = output.into_shape_with_order(height * width * channels).map_err(|e| {
            StudioError::Inference(format!("mask tensor is not contiguous: {}", e))
        })?;

        let person = channels - 1;
        let values = (0..height * width)
            .map(|i| {
                if channels_last {
                    output[i * channels + person]
                } else {
                    output[person * height * width + i]
                }
            })
            .collect();

        Ok((width as u32, height as u32, values))
    }

    /// Resize a model-resolution probability map back to the photo size
    pub fn postprocess_mask(
        values: Vec<f32>,
        mask_width: u32,
        mask_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Result<Mask> {
        let _span = tracing::debug_span!("postprocess").entered();

        if mask_width == target_width && mask_height == target_height {
            return Mask::from_raw(target_width, target_height, values);
        }

        let map: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(mask_width, mask_height, values).ok_or_else(|| {
                StudioError::Inference(format!(
                    "probability map does not fill {}x{}",
                    mask_width, mask_height
                ))
            })?;

        let resized = imageops::resize(
            &map,
            target_width,
            target_height,
            imageops::FilterType::Triangle,
        );

        Mask::from_raw(target_width, target_height, resized.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::{Array, IxDyn};

    #[test]
    fn nhwc_tensor_is_normalized() {
        let image = RgbImage::from_pixel(4, 2, Rgb([255, 0, 51]));
        let tensor = Preprocessor::new(4, 2, TensorLayout::Nhwc).preprocess(&image);

        assert_eq!(tensor.shape(), &[1, 2, 4, 3]);
        assert_eq!(tensor[[0, 1, 3, 0]], 1.0);
        assert_eq!(tensor[[0, 1, 3, 1]], 0.0);
        assert!((tensor[[0, 1, 3, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn nchw_tensor_resizes_to_model_input() {
        let image = RgbImage::from_pixel(10, 10, Rgb([0, 255, 0]));
        let tensor = Preprocessor::new(8, 4, TensorLayout::Nchw).preprocess(&image);

        assert_eq!(tensor.shape(), &[1, 3, 4, 8]);
        assert!((tensor[[0, 1, 2, 2]] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn extracts_single_channel_nhwc() {
        let output = Array::from_shape_vec(IxDyn(&[1, 2, 3, 1]), vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5])
            .unwrap();
        let (w, h, values) = Preprocessor::extract_probabilities(output.view()).unwrap();

        assert_eq!((w, h), (3, 2));
        assert_eq!(values, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn takes_person_channel_from_two_class_nchw() {
        let output = Array::from_shape_vec(
            IxDyn(&[1, 2, 1, 3]),
            vec![0.9, 0.8, 0.7, 0.1, 0.2, 0.3],
        )
        .unwrap();
        let (w, h, values) = Preprocessor::extract_probabilities(output.view()).unwrap();

        assert_eq!((w, h), (3, 1));
        assert_eq!(values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn rejects_unknown_shape() {
        let output = Array::from_shape_vec(IxDyn(&[2, 1, 1, 1]), vec![0.0, 0.0]).unwrap();
        assert!(Preprocessor::extract_probabilities(output.view()).is_err());
    }

    #[test]
    fn postprocess_scales_to_photo_size() {
        let mask = Preprocessor::postprocess_mask(vec![1.0; 4], 2, 2, 6, 5).unwrap();

        assert_eq!(mask.dimensions(), (6, 5));
        assert!(mask.values().iter().all(|v| (*v - 1.0).abs() < 1e-5));
    }
}
