use dreamcanvas_contracts::wizard::{Step, WizardAction};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Input rejected before anything was sent; the step did not change.
    #[error("{message}")]
    Validation { message: String },

    #[error("no API key selected")]
    MissingCredential,

    /// The capability failed or returned nothing usable. The wizard is back
    /// on the prompt step.
    #[error("image generation failed: {0}")]
    Generation(String),

    #[error("cannot {action} from step '{step}'")]
    InvalidTransition { action: WizardAction, step: Step },

    #[error("configuration is locked while an image is generating")]
    Busy,

    #[error("generation {0} is not in flight")]
    UnknownGeneration(u64),
}
