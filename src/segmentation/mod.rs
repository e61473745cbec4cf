mod preprocess;
mod selfie;
pub mod types;

pub use preprocess::{Preprocessor, TensorLayout};
pub use selfie::SelfieSegmenter;
pub use types::{Mask, SegmentationModel};

use crate::error::StudioError;
use std::path::Path;

/// Load the default segmentation model
///
/// Any failure here leaves the studio unusable, so it is reported as
/// `ModelUnavailable`.
pub fn create_default_model(
    model_path: &Path,
    width: u32,
    height: u32,
    layout: TensorLayout,
) -> Result<Box<dyn SegmentationModel>, StudioError> {
    if !model_path.exists() {
        return Err(StudioError::ModelUnavailable {
            path: model_path.to_path_buf(),
            source: anyhow::anyhow!("model file does not exist"),
        });
    }

    let model = SelfieSegmenter::new(model_path, width, height, layout).map_err(|source| {
        StudioError::ModelUnavailable {
            path: model_path.to_path_buf(),
            source,
        }
    })?;
    Ok(Box::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_unavailable() {
        let result = create_default_model(
            Path::new("/nonexistent/selfie.onnx"),
            256,
            144,
            TensorLayout::Nhwc,
        );
        assert!(matches!(result, Err(StudioError::ModelUnavailable { .. })));
    }
}
