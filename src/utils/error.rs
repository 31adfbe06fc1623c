use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Postal code prefix '{prefix}' not found in temperature data")]
    PostalCodeNotFound { prefix: String },

    #[error("Elevation {meters} m is outside the plausible range")]
    InvalidElevation { meters: i64 },

    #[error("Altitude exceeds maximum configured altitude {max_meters} m")]
    AltitudeExceedsRange { max_meters: i32 },

    #[error("address or postalCode must be provided")]
    MissingInput,

    #[error("Malformed request body: {reason}")]
    InvalidRequest { reason: String },

    #[error("Dataset error ({path}): {message}")]
    Dataset { path: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 請求本身有問題，回傳 400
    Validation,
    Configuration,
    Internal,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::PostalCodeNotFound { .. }
            | AppError::InvalidElevation { .. }
            | AppError::AltitudeExceedsRange { .. }
            | AppError::MissingInput
            | AppError::InvalidRequest { .. } => ErrorCategory::Validation,
            AppError::ConfigError { .. } | AppError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            _ => ErrorCategory::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::Dataset { .. } | AppError::CsvError(_) | AppError::SerializationError(_) => {
                "Check the dataset files referenced in the [datasets] section"
            }
            AppError::IoError(_) => "Check that the configured files exist and are readable",
            AppError::ConfigError { .. } | AppError::InvalidConfigValueError { .. } => {
                "Check the configuration file and command line flags"
            }
            AppError::HttpClient(_) => "Check the [api] settings and network access",
            _ => "Check the request parameters",
        }
    }
}

/// Failure of a single outbound lookup (geocoder or elevation service).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no result returned")]
    NotFound,

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::InvalidResponse(err.to_string())
        } else {
            LookupError::Unavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
