use crate::error::{Result, StudioError};
use image::{GrayImage, Luma, RgbImage};

/// Foreground probability mask: 0.0 = background, 1.0 = person
///
/// Values are stored row-major and always clamped into [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Mask {
    /// Build a mask from row-major values
    pub fn from_raw(width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(StudioError::Inference(format!(
                "mask of {}x{} needs {} values, got {}",
                width,
                height,
                expected,
                values.len()
            )));
        }

        let values = values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect();
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> f32,
    {
        let mut values = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y).clamp(0.0, 1.0));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Grayscale matte for inspection (white = person)
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([(self.get(x, y) * 255.0).round() as u8])
        })
    }
}

/// Person segmentation backend
///
/// The handle is built once and reused for every photo.
pub trait SegmentationModel {
    /// Return a foreground mask with the same dimensions as `image`
    fn segment(&mut self, image: &RgbImage) -> anyhow::Result<Mask>;

    /// Model input dimensions as (width, height)
    fn input_size(&self) -> (u32, u32);
}
