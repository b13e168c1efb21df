use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version '{text}': {reason}")]
    InvalidVersionFormat { text: String, reason: String },

    #[error("Invalid requirement '{text}': {reason}")]
    InvalidRequirementFormat { text: String, reason: String },
}

impl VersionError {
    pub(crate) fn version(text: &str, reason: impl Into<String>) -> Self {
        VersionError::InvalidVersionFormat {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn requirement(text: &str, reason: impl Into<String>) -> Self {
        VersionError::InvalidRequirementFormat {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
