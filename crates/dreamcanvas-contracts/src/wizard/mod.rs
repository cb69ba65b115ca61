mod config;
mod data_uri;
mod messages;
mod palette;
mod step;

pub use config::{ArtStyle, AspectRatio, ConfigUpdate, ImageConfig, ParseOptionError};
pub use data_uri::{DataUri, DataUriError};
pub use messages::{Locale, Messages, StepInfo};
pub use palette::{find_color, normalize_color, PaletteColor, PALETTE};
pub use step::{Step, WizardAction, INPUT_STEPS, TRANSITIONS};
