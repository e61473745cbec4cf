//! Replace the background behind a person in a photo.
//!
//! A segmentation model produces a foreground probability mask, a
//! [`background::BackgroundProvider`] builds the replacement backdrop and
//! [`compositor::composite`] picks each output pixel from one or the other.

pub mod background;
pub mod capture;
pub mod compositor;
pub mod error;
pub mod output;
pub mod segmentation;
pub mod studio;

pub use background::{BackgroundProvider, BackgroundStyle, BlurStrength, StockScene, Theme};
pub use compositor::{composite, Threshold};
pub use error::{Result, StudioError};
pub use segmentation::{Mask, SegmentationModel};
pub use studio::{Studio, StudioRequest, StudioResult};
