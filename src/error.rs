use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning one photo into a studio portrait
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Segmentation model is not available ({path}): {source}")]
    ModelUnavailable {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Segmentation failed: {0}")]
    Inference(String),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Failed to decode {what}")]
    Decode {
        what: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid color {0:?}, expected #RRGGBB or #RGB")]
    InvalidColor(String),

    #[error("Threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),

    #[error("Blur strength {0} must be an odd kernel size between 5 and 95")]
    InvalidBlurStrength(u32),

    #[error("Unknown background style {0:?} (see --list-styles)")]
    UnknownStyle(String),

    #[error("Failed to fetch {url} after {attempts} attempt(s): {reason}")]
    Fetch {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("Failed to create HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("{what} is {actual:?} but the photo is {expected:?}")]
    DimensionMismatch {
        what: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Failed to encode PNG")]
    Encode(#[source] image::ImageError),

    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Camera capture failed: {0}")]
    Capture(String),
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_names_both_sizes() {
        let err = StudioError::DimensionMismatch {
            what: "mask",
            expected: (4, 3),
            actual: (2, 2),
        };
        assert_eq!(err.to_string(), "mask is (2, 2) but the photo is (4, 3)");
    }

    #[test]
    fn fetch_error_reports_attempts() {
        let err = StudioError::Fetch {
            url: "https://example.invalid/a.jpg".into(),
            attempts: 2,
            reason: "timed out".into(),
        };
        assert!(err.to_string().contains("after 2 attempt(s)"));
    }

    #[test]
    fn http_client_error_does_not_pose_as_fetch() {
        let source = reqwest::blocking::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = StudioError::HttpClient(source);
        assert_eq!(err.to_string(), "Failed to create HTTP client");
    }
}
