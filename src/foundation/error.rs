/// Convenience result type used across sticky-reveal.
pub type RevealResult<T> = Result<T, RevealError>;

/// Top-level error taxonomy used by the crate's APIs.
///
/// Ambiguous edge configuration is not an error: it is reported as an invalid
/// [`crate::EdgeOffsetConfig`] and handled by forcing static flow.
#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    /// Invalid user-provided configuration or scenario data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The rendering host could not answer a query (unknown or foreign node).
    #[error("host error: {0}")]
    Host(String),

    /// Errors when serializing or deserializing scenarios and traces.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RevealError {
    /// Build a [`RevealError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RevealError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`RevealError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
