mod compiler;
mod error;
mod keys;
mod providers;
mod wizard;

pub use compiler::{
    compile_prompt_text, compile_request, extension_for_mime, extract_image, sniff_image_mime,
    GeneratedImage, GenerationRequest, GenerationResponse, InlineData, PromptPart, ResponseError,
    ResponsePart, IMAGE_SIZE_HINT,
};
pub use error::WizardError;
pub use keys::{ApiKey, ApiKeySource, EnvKeySource, StaticKeySource};
pub use providers::{
    provider_for_model, DryrunProvider, GeminiProvider, GeminiSettings, ImageProvider,
};
pub use wizard::{Advance, PendingGeneration, Wizard};
