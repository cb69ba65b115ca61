use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dreamcanvas_contracts::wizard::{AspectRatio, DataUri, ImageConfig};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Fixed output-size hint sent with every request.
pub const IMAGE_SIZE_HINT: &str = "2K";

const FALLBACK_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptPart {
    Text(String),
    InlineData(InlineData),
}

/// Everything the generation capability needs for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub parts: Vec<PromptPart>,
    pub aspect_ratio: AspectRatio,
    pub image_size: String,
    /// The user's prompt, kept so the result can be labelled with it.
    pub prompt: String,
}

impl GenerationRequest {
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            PromptPart::Text(text) => Some(text.as_str()),
            PromptPart::InlineData(_) => None,
        })
    }

    pub fn inline_parts(&self) -> impl Iterator<Item = &InlineData> {
        self.parts.iter().filter_map(|part| match part {
            PromptPart::InlineData(inline) => Some(inline),
            PromptPart::Text(_) => None,
        })
    }

    /// Hex SHA-256 of the serialized request; equal requests share it.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(bytes))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub data_uri: DataUri,
    pub prompt: String,
}

impl GeneratedImage {
    pub fn mime_type(&self) -> &str {
        self.data_uri.mime_type()
    }

    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        self.data_uri.decode()
    }

    /// File extension matching the image mime type.
    pub fn extension(&self) -> &'static str {
        extension_for_mime(self.mime_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("no image produced")]
    NoImage,
    #[error("image data is malformed: {0}")]
    Malformed(String),
}

pub fn compile_request(config: &ImageConfig) -> GenerationRequest {
    let mut parts = Vec::new();
    if let Some(reference) = config.reference_image.as_ref() {
        parts.push(PromptPart::InlineData(InlineData {
            mime_type: reference.mime_type().to_string(),
            data: reference.payload().to_string(),
        }));
    }
    parts.push(PromptPart::Text(compile_prompt_text(config)));

    GenerationRequest {
        parts,
        aspect_ratio: config.aspect_ratio,
        image_size: IMAGE_SIZE_HINT.to_string(),
        prompt: config.prompt.clone(),
    }
}

pub fn compile_prompt_text(config: &ImageConfig) -> String {
    let mut lines = vec![
        "Create a high-quality image.".to_string(),
        format!("Subject/Description: {}", config.prompt),
        format!("Art Style: {}", config.style.display_name()),
        format!("Aspect Ratio requested: {}", config.aspect_ratio),
    ];

    if let Some(color) = config.primary_color.as_deref() {
        let mut line = format!("Primary Tone/Color: {color}");
        if config.is_gradient {
            line.push_str(" (Apply a gradient effect using this color)");
        }
        lines.push(line);
    }

    if config.remove_background {
        lines.push(
            "Background: Plain, simple, or transparent friendly (white/black solid) \
             to allow easy extraction. Keep the subject isolated."
                .to_string(),
        );
    }

    lines.join("\n")
}

/// Picks the first part with inline data and wraps it as a data URI.
///
/// The payload is passed through untouched. The mime type is the one the
/// capability reported; without one it is sniffed from the bytes.
pub fn extract_image(
    response: &GenerationResponse,
    prompt: &str,
) -> Result<GeneratedImage, ResponseError> {
    let inline = response
        .parts
        .iter()
        .filter_map(|part| part.inline_data.as_ref())
        .find(|inline| !inline.data.trim().is_empty())
        .ok_or(ResponseError::NoImage)?;

    let reported = inline.mime_type.trim();
    let mime_type = if reported.is_empty() {
        let bytes = BASE64
            .decode(inline.data.trim().as_bytes())
            .map_err(|err| ResponseError::Malformed(err.to_string()))?;
        sniff_image_mime(&bytes).unwrap_or(FALLBACK_MIME).to_string()
    } else {
        reported.to_string()
    };

    let data_uri = DataUri::new(mime_type, inline.data.as_str())
        .map_err(|err| ResponseError::Malformed(err.to_string()))?;
    Ok(GeneratedImage {
        data_uri,
        prompt: prompt.to_string(),
    })
}

pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    match format {
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::WebP => Some("image/webp"),
        image::ImageFormat::Gif => Some("image/gif"),
        _ => None,
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    let lowered = mime.to_ascii_lowercase();
    if lowered.contains("jpeg") || lowered.contains("jpg") {
        return "jpg";
    }
    if lowered.contains("webp") {
        return "webp";
    }
    if lowered.contains("gif") {
        return "gif";
    }
    "png"
}
