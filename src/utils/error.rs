use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{operation} returned unexpected status: {status}")]
    StatusError {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

impl ShopError {
    /// 傳輸層錯誤:連線失敗或非 2xx 狀態碼
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ShopError::ApiError(_) | ShopError::StatusError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
