mod dryrun;
mod gemini;

use anyhow::{bail, Result};
use dreamcanvas_contracts::models::ModelSpec;

pub use dryrun::DryrunProvider;
pub use gemini::{GeminiProvider, GeminiSettings};

use crate::compiler::{GenerationRequest, GenerationResponse};
use crate::keys::ApiKey;

/// The external image-generation capability.
///
/// Any error is treated by the wizard as "generation failed".
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, request: &GenerationRequest, key: &ApiKey) -> Result<GenerationResponse>;
}

/// Builds the provider that serves `model`.
pub fn provider_for_model(model: &ModelSpec) -> Result<Box<dyn ImageProvider>> {
    match model.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(GeminiSettings::from_env(
            &model.name,
        )))),
        "dryrun" => Ok(Box::new(DryrunProvider)),
        other => bail!("no provider registered for '{other}' (model {})", model.name),
    }
}
