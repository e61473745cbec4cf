use super::preprocess::{Preprocessor, TensorLayout};
use super::types::{Mask, SegmentationModel};
use anyhow::{Context, Result};
use image::RgbImage;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::TensorRef;
use std::path::Path;

/// Selfie segmentation model (landscape variant by default)
///
/// Produces a single-channel person probability map at the model resolution
/// which is scaled back to the photo size.
pub struct SelfieSegmenter {
    session: Session,
    preprocessor: Preprocessor,
    width: u32,
    height: u32,
}

impl SelfieSegmenter {
    /// Default input width of the landscape model
    pub const DEFAULT_WIDTH: u32 = 256;
    /// Default input height of the landscape model
    pub const DEFAULT_HEIGHT: u32 = 144;

    /// Load a segmentation model from an ONNX file
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `width`, `height` - Model input size
    /// * `layout` - Tensor layout the model expects
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        width: u32,
        height: u32,
        layout: TensorLayout,
    ) -> Result<Self> {
        let path = model_path.as_ref();

        tracing::info!("Loading segmentation model from {}", path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        tracing::debug!(
            "Model inputs: {:?}, outputs: {:?}",
            session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
            session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>()
        );

        Ok(Self {
            session,
            preprocessor: Preprocessor::new(width, height, layout),
            width,
            height,
        })
    }
}

impl SegmentationModel for SelfieSegmenter {
    fn segment(&mut self, image: &RgbImage) -> Result<Mask> {
        let _span = tracing::debug_span!("selfie_segment").entered();

        let input_tensor = self.preprocessor.preprocess(image);

        let _infer_span = tracing::debug_span!("inference").entered();
        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(&input_tensor)?])
            .context("Failed to run inference")?;
        drop(_infer_span);

        let (mask_width, mask_height, values) = Preprocessor::extract_probabilities(
            outputs[0]
                .try_extract_array::<f32>()
                .context("Model output is not a float tensor")?,
        )?;

        let (width, height) = image.dimensions();
        let mask = Preprocessor::postprocess_mask(values, mask_width, mask_height, width, height)?;

        Ok(mask)
    }

    fn input_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
