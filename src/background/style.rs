use crate::error::{Result, StudioError};
use image::Rgb;
use std::fmt;
use std::str::FromStr;

/// Gaussian kernel size used by the blur backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurStrength(u32);

impl BlurStrength {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 95;
    pub const DEFAULT: BlurStrength = BlurStrength(35);

    pub fn new(kernel_size: u32) -> Result<Self> {
        if kernel_size % 2 == 0 || !(Self::MIN..=Self::MAX).contains(&kernel_size) {
            return Err(StudioError::InvalidBlurStrength(kernel_size));
        }
        Ok(Self(kernel_size))
    }

    pub fn kernel_size(self) -> u32 {
        self.0
    }

    /// Sigma a Gaussian with this kernel size uses when none is given
    pub fn sigma(self) -> f32 {
        0.3 * ((self.0 as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

impl Default for BlurStrength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Backdrop gallery sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    StandardEffects,
    ProfessionalOffice,
    NatureScenery,
    SciFi,
    CustomUpload,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::StandardEffects,
        Theme::ProfessionalOffice,
        Theme::NatureScenery,
        Theme::SciFi,
        Theme::CustomUpload,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Theme::StandardEffects => "Standard Effects",
            Theme::ProfessionalOffice => "Professional Office",
            Theme::NatureScenery => "Nature & Scenery",
            Theme::SciFi => "Sci-Fi & Cyberpunk",
            Theme::CustomUpload => "Custom Upload",
        }
    }

    /// Style names offered under this theme, as (label, key)
    pub fn styles(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Theme::StandardEffects => vec![
                ("Blur Background", "blur-background"),
                ("Solid Color", "solid-color"),
                ("Digital Green Screen", "digital-green-screen"),
            ],
            Theme::CustomUpload => vec![("Custom", "custom")],
            theme => StockScene::ALL
                .iter()
                .filter(|scene| scene.theme() == theme)
                .map(|scene| (scene.label(), scene.key()))
                .collect(),
        }
    }
}

/// Stock scenes, each optionally backed by a fixed remote image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockScene {
    ModernGlassOffice,
    MinimalistStudio,
    LuxuryLibrary,
    Bed,
    TropicalBeach,
    MountainMist,
    AutumnForest,
    CyberpunkStreet,
    DeepSpaceStation,
    NeonGrid,
    NoWay,
}

impl StockScene {
    pub const ALL: [StockScene; 11] = [
        StockScene::ModernGlassOffice,
        StockScene::MinimalistStudio,
        StockScene::LuxuryLibrary,
        StockScene::Bed,
        StockScene::TropicalBeach,
        StockScene::MountainMist,
        StockScene::AutumnForest,
        StockScene::CyberpunkStreet,
        StockScene::DeepSpaceStation,
        StockScene::NeonGrid,
        StockScene::NoWay,
    ];

    pub fn theme(self) -> Theme {
        match self {
            StockScene::ModernGlassOffice
            | StockScene::MinimalistStudio
            | StockScene::LuxuryLibrary
            | StockScene::Bed => Theme::ProfessionalOffice,
            StockScene::TropicalBeach | StockScene::MountainMist | StockScene::AutumnForest => {
                Theme::NatureScenery
            }
            StockScene::CyberpunkStreet
            | StockScene::DeepSpaceStation
            | StockScene::NeonGrid
            | StockScene::NoWay => Theme::SciFi,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockScene::ModernGlassOffice => "Modern Glass Office",
            StockScene::MinimalistStudio => "Minimalist Studio",
            StockScene::LuxuryLibrary => "Luxury Library",
            StockScene::Bed => "Bed",
            StockScene::TropicalBeach => "Tropical Beach",
            StockScene::MountainMist => "Mountain Mist",
            StockScene::AutumnForest => "Autumn Forest",
            StockScene::CyberpunkStreet => "Cyberpunk Street",
            StockScene::DeepSpaceStation => "Deep Space Station",
            StockScene::NeonGrid => "Neon Grid",
            StockScene::NoWay => "no way",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            StockScene::ModernGlassOffice => "modern-glass-office",
            StockScene::MinimalistStudio => "minimalist-studio",
            StockScene::LuxuryLibrary => "luxury-library",
            StockScene::Bed => "bed",
            StockScene::TropicalBeach => "tropical-beach",
            StockScene::MountainMist => "mountain-mist",
            StockScene::AutumnForest => "autumn-forest",
            StockScene::CyberpunkStreet => "cyberpunk-street",
            StockScene::DeepSpaceStation => "deep-space-station",
            StockScene::NeonGrid => "neon-grid",
            StockScene::NoWay => "no-way",
        }
    }

    /// Remote image for the scene; `None` for scenes without artwork yet
    pub fn url(self) -> Option<&'static str> {
        match self {
            StockScene::ModernGlassOffice => Some(
                "https://images.unsplash.com/photo-1497366216548-37526070297c?q=80&w=1000",
            ),
            StockScene::LuxuryLibrary => Some(
                "https://images.unsplash.com/photo-1507842217343-583bb7270b66?q=80&w=1000",
            ),
            StockScene::TropicalBeach => Some(
                "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?q=80&w=1000",
            ),
            StockScene::MountainMist => Some(
                "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?q=80&w=1000",
            ),
            StockScene::CyberpunkStreet => Some(
                "https://images.unsplash.com/photo-1605810230434-7631ac76ec81?q=80&w=1000",
            ),
            StockScene::DeepSpaceStation => Some(
                "https://images.unsplash.com/photo-1451187580459-43490279c0fa?q=80&w=1000",
            ),
            StockScene::NoWay => Some(
                "https://plus.unsplash.com/premium_photo-1770723751148-89490a75e354?q=80&w=1170",
            ),
            StockScene::Bed => Some(
                "https://plus.unsplash.com/premium_photo-1733864822156-f3cf26187fd9?q=80&w=1171",
            ),
            StockScene::MinimalistStudio | StockScene::AutumnForest | StockScene::NeonGrid => None,
        }
    }
}

/// What to put behind the person
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStyle {
    Blur { strength: BlurStrength },
    SolidColor(Rgb<u8>),
    GreenScreen,
    Custom { upload: Option<Vec<u8>> },
    Stock(StockScene),
}

impl BackgroundStyle {
    pub fn theme(&self) -> Theme {
        match self {
            BackgroundStyle::Blur { .. }
            | BackgroundStyle::SolidColor(_)
            | BackgroundStyle::GreenScreen => Theme::StandardEffects,
            BackgroundStyle::Custom { .. } => Theme::CustomUpload,
            BackgroundStyle::Stock(scene) => scene.theme(),
        }
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundStyle::Blur { strength } => {
                write!(f, "Blur Background (k={})", strength.kernel_size())
            }
            BackgroundStyle::SolidColor(c) => {
                write!(f, "Solid Color (#{:02X}{:02X}{:02X})", c[0], c[1], c[2])
            }
            BackgroundStyle::GreenScreen => f.write_str("Digital Green Screen"),
            BackgroundStyle::Custom { .. } => f.write_str("Custom"),
            BackgroundStyle::Stock(scene) => f.write_str(scene.label()),
        }
    }
}

/// Parsed style name, before its parameters are attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleName {
    Blur,
    SolidColor,
    GreenScreen,
    Custom,
    Stock(StockScene),
}

impl StyleName {
    /// Attach the parameters this style needs
    pub fn with_params(
        self,
        strength: BlurStrength,
        color: Rgb<u8>,
        upload: Option<Vec<u8>>,
    ) -> BackgroundStyle {
        match self {
            StyleName::Blur => BackgroundStyle::Blur { strength },
            StyleName::SolidColor => BackgroundStyle::SolidColor(color),
            StyleName::GreenScreen => BackgroundStyle::GreenScreen,
            StyleName::Custom => BackgroundStyle::Custom { upload },
            StyleName::Stock(scene) => BackgroundStyle::Stock(scene),
        }
    }
}

impl FromStr for StyleName {
    type Err = StudioError;

    /// Accepts display labels ("Tropical Beach") and keys ("tropical-beach")
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        let name = match wanted.as_str() {
            "blur" | "blur-background" => StyleName::Blur,
            "solid" | "solid-color" => StyleName::SolidColor,
            "green-screen" | "digital-green-screen" => StyleName::GreenScreen,
            "custom" | "custom-upload" => StyleName::Custom,
            other => StockScene::ALL
                .iter()
                .find(|scene| scene.key() == other)
                .map(|scene| StyleName::Stock(*scene))
                .ok_or_else(|| StudioError::UnknownStyle(s.to_string()))?,
        };
        Ok(name)
    }
}
