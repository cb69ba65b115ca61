use std::io::Cursor;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dreamcanvas_contracts::wizard::AspectRatio;
use image::{ImageFormat, Rgb, RgbImage};
use sha2::{Digest, Sha256};

use super::ImageProvider;
use crate::compiler::{GenerationRequest, GenerationResponse, InlineData, ResponsePart};
use crate::keys::ApiKey;

const DRYRUN_UNIT_PX: u32 = 16;

/// Local stand-in for a remote model: answers every request with a solid
/// PNG whose colour is derived from the request text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryrunProvider;

impl ImageProvider for DryrunProvider {
    fn name(&self) -> &str {
        "dryrun"
    }

    fn generate(&self, request: &GenerationRequest, _key: &ApiKey) -> Result<GenerationResponse> {
        let (width, height) = dryrun_dims(request.aspect_ratio);
        let (r, g, b) = color_from_text(request.text().unwrap_or(&request.prompt));
        let image = RgbImage::from_pixel(width, height, Rgb([r, g, b]));

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .context("dryrun image encode failed")?;

        Ok(GenerationResponse {
            parts: vec![
                ResponsePart {
                    text: Some(format!("dryrun {width}x{height}")),
                    inline_data: None,
                },
                ResponsePart {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png".to_string(),
                        data: BASE64.encode(png.into_inner()),
                    }),
                },
            ],
        })
    }
}

fn dryrun_dims(ratio: AspectRatio) -> (u32, u32) {
    let (w, h) = ratio.dimensions();
    (w * DRYRUN_UNIT_PX, h * DRYRUN_UNIT_PX)
}

fn color_from_text(text: &str) -> (u8, u8, u8) {
    let digest = Sha256::digest(text.as_bytes());
    (digest[0], digest[1], digest[2])
}
