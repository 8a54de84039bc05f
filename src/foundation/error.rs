pub type FaceResult<T> = Result<T, FaceError>;

#[derive(thiserror::Error, Debug)]
pub enum FaceError {
    /// No asset bytes were handed to the decoder. This is a wiring bug, not bad remote data.
    #[error("null asset: no icon bytes were provided")]
    NullAsset,

    #[error("malformed image: {0}")]
    MalformedImage(String),

    #[error("asset resolution error: {0}")]
    AssetResolution(String),

    #[error("timer scheduling error: {0}")]
    TimerScheduling(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FaceError {
    pub fn malformed_image(msg: impl Into<String>) -> Self {
        Self::MalformedImage(msg.into())
    }

    pub fn asset_resolution(msg: impl Into<String>) -> Self {
        Self::AssetResolution(msg.into())
    }

    pub fn timer_scheduling(msg: impl Into<String>) -> Self {
        Self::TimerScheduling(msg.into())
    }

    pub fn missing_field(key: impl Into<String>) -> Self {
        Self::MissingField(key.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short stable name of the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NullAsset => "null_asset",
            Self::MalformedImage(_) => "malformed_image",
            Self::AssetResolution(_) => "asset_resolution",
            Self::TimerScheduling(_) => "timer_scheduling",
            Self::MissingField(_) => "missing_field",
            Self::Validation(_) => "validation",
            Self::Other(_) => "other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
