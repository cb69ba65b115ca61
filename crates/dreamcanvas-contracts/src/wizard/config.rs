use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data_uri::DataUri;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Desktop,
    #[serde(rename = "3:4")]
    Tall,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Desktop,
        AspectRatio::Tall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Desktop => "4:3",
            AspectRatio::Tall => "3:4",
        }
    }

    /// Width and height units of the ratio, e.g. `(16, 9)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::Landscape => (16, 9),
            AspectRatio::Portrait => (9, 16),
            AspectRatio::Desktop => (4, 3),
            AspectRatio::Tall => (3, 4),
        }
    }

    fn alias(self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Desktop => "desktop",
            AspectRatio::Tall => "tall",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ParseOptionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['x', '/'], ":");
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == normalized || ratio.alias() == normalized)
            .ok_or_else(|| ParseOptionError {
                kind: "aspect ratio",
                value: raw.trim().to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|ratio| ratio.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtStyle {
    #[default]
    Realistic,
    Anime,
    Cyberpunk,
    #[serde(rename = "Oil Painting")]
    OilPainting,
    #[serde(rename = "3D Render")]
    ThreeDRender,
    #[serde(rename = "Pencil Sketch")]
    Sketch,
    Minimalist,
    #[serde(rename = "Fantasy Art")]
    Fantasy,
}

impl ArtStyle {
    pub const ALL: [ArtStyle; 8] = [
        ArtStyle::Realistic,
        ArtStyle::Anime,
        ArtStyle::Cyberpunk,
        ArtStyle::OilPainting,
        ArtStyle::ThreeDRender,
        ArtStyle::Sketch,
        ArtStyle::Minimalist,
        ArtStyle::Fantasy,
    ];

    /// Name written into the generation instruction.
    pub fn display_name(self) -> &'static str {
        match self {
            ArtStyle::Realistic => "Realistic",
            ArtStyle::Anime => "Anime",
            ArtStyle::Cyberpunk => "Cyberpunk",
            ArtStyle::OilPainting => "Oil Painting",
            ArtStyle::ThreeDRender => "3D Render",
            ArtStyle::Sketch => "Pencil Sketch",
            ArtStyle::Minimalist => "Minimalist",
            ArtStyle::Fantasy => "Fantasy Art",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ArtStyle::Realistic => "realistic",
            ArtStyle::Anime => "anime",
            ArtStyle::Cyberpunk => "cyberpunk",
            ArtStyle::OilPainting => "oil-painting",
            ArtStyle::ThreeDRender => "3d-render",
            ArtStyle::Sketch => "sketch",
            ArtStyle::Minimalist => "minimalist",
            ArtStyle::Fantasy => "fantasy",
        }
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ArtStyle {
    type Err = ParseOptionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let squash = |value: &str| {
            value
                .chars()
                .filter(|ch| ch.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let wanted = squash(raw);
        Self::ALL
            .into_iter()
            .find(|style| {
                !wanted.is_empty()
                    && (squash(style.display_name()) == wanted
                        || squash(style.slug()) == wanted
                        || (wanted == "3d" && *style == ArtStyle::ThreeDRender))
            })
            .ok_or_else(|| ParseOptionError {
                kind: "art style",
                value: raw.trim().to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|style| style.slug())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Everything the wizard collects before generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    pub style: ArtStyle,
    pub primary_color: Option<String>,
    pub is_gradient: bool,
    pub remove_background: bool,
    pub prompt: String,
    pub reference_image: Option<DataUri>,
}

impl ImageConfig {
    /// Returns a new record with `update` applied on top of `self`.
    pub fn merged(&self, update: ConfigUpdate) -> ImageConfig {
        let current = self.clone();
        ImageConfig {
            aspect_ratio: update.aspect_ratio.unwrap_or(current.aspect_ratio),
            style: update.style.unwrap_or(current.style),
            primary_color: update
                .primary_color
                .map(|color| {
                    color
                        .map(|value| value.trim().to_string())
                        .filter(|value| !value.is_empty())
                })
                .unwrap_or(current.primary_color),
            is_gradient: update.is_gradient.unwrap_or(current.is_gradient),
            remove_background: update
                .remove_background
                .unwrap_or(current.remove_background),
            prompt: update.prompt.unwrap_or(current.prompt),
            reference_image: update.reference_image.unwrap_or(current.reference_image),
        }
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Partial edit of an [`ImageConfig`]. `None` leaves a field untouched; the
/// nested options of `primary_color` and `reference_image` distinguish
/// "clear" (`Some(None)`) from "keep" (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub aspect_ratio: Option<AspectRatio>,
    pub style: Option<ArtStyle>,
    pub primary_color: Option<Option<String>>,
    pub is_gradient: Option<bool>,
    pub remove_background: Option<bool>,
    pub prompt: Option<String>,
    pub reference_image: Option<Option<DataUri>>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn style(mut self, style: ArtStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn primary_color(mut self, color: Option<impl Into<String>>) -> Self {
        self.primary_color = Some(color.map(Into::into));
        self
    }

    pub fn gradient(mut self, enabled: bool) -> Self {
        self.is_gradient = Some(enabled);
        self
    }

    pub fn remove_background(mut self, enabled: bool) -> Self {
        self.remove_background = Some(enabled);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn reference_image(mut self, image: Option<DataUri>) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ConfigUpdate::default()
    }

    /// Names of the fields this update touches, in declaration order.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.aspect_ratio.is_some() {
            fields.push("aspectRatio");
        }
        if self.style.is_some() {
            fields.push("style");
        }
        if self.primary_color.is_some() {
            fields.push("primaryColor");
        }
        if self.is_gradient.is_some() {
            fields.push("isGradient");
        }
        if self.remove_background.is_some() {
            fields.push("removeBackground");
        }
        if self.prompt.is_some() {
            fields.push("prompt");
        }
        if self.reference_image.is_some() {
            fields.push("referenceImage");
        }
        fields
    }
}
