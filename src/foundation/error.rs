/// Convenience result alias used across the crate.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Error type for composition, asset resolution and text layout.
#[derive(thiserror::Error, Debug)]
pub enum ScreenError {
    /// Invalid user-provided data (settings, layout table, filter syntax).
    #[error("validation error: {0}")]
    Validation(String),

    /// A texture or layer image could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A font face is missing or could not be registered.
    #[error("font error: {0}")]
    Font(String),

    /// Rasterization failure inside a surface.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScreenError {
    /// Build [`ScreenError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`ScreenError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build [`ScreenError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build [`ScreenError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build [`ScreenError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
