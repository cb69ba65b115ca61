use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    #[error("data URI must start with 'data:'")]
    MissingScheme,
    #[error("data URI is missing the ',' payload separator")]
    MissingPayload,
    #[error("data URI payload must be base64 encoded")]
    NotBase64,
    #[error("data URI has an empty mime type")]
    EmptyMimeType,
    #[error("data URI payload is empty")]
    EmptyPayload,
}

/// `data:<mime>;base64,<payload>` split into its two halves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    mime_type: String,
    payload: String,
}

impl DataUri {
    pub fn new(
        mime_type: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Self, DataUriError> {
        let mime_type = mime_type.into().trim().to_ascii_lowercase();
        let payload = payload.into().trim().to_string();
        if mime_type.is_empty() {
            return Err(DataUriError::EmptyMimeType);
        }
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        Ok(Self { mime_type, payload })
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Result<Self, DataUriError> {
        Self::new(mime_type, BASE64.encode(bytes))
    }

    pub fn parse(raw: &str) -> Result<Self, DataUriError> {
        let rest = raw
            .trim()
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;
        Self::new(mime_type, payload)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 text after the comma, unchanged.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(self.payload.as_bytes())
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl FromStr for DataUri {
    type Err = DataUriError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for DataUri {
    type Error = DataUriError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<DataUri> for String {
    fn from(uri: DataUri) -> Self {
        uri.to_string()
    }
}
