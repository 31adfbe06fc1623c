use crate::domain::model::ErrorResponse;
use crate::utils::error::{AppError, ErrorCategory};
use serde::{Deserialize, Serialize};

/// User-visible error texts. Every field can be overridden from the
/// `[messages]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    pub validation: String,
    pub internal_server: String,
    pub unexpected: String,
    pub postal_code_not_found: String,
    /// `{max}` 會被替換成設定的最高海拔
    pub altitude_exceed: String,
    pub invalid_elevation: String,
    pub address_postal_code_required: String,
    /// `{reason}` 會被替換成 JSON 解析錯誤
    pub invalid_request: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            validation: "Validation error".to_string(),
            internal_server: "Internal server error".to_string(),
            unexpected: "An unexpected error occurred".to_string(),
            postal_code_not_found: "Postal Code prefix not found in temperature data".to_string(),
            altitude_exceed: "Altitude exceed {max} meters, no temperature offset data available."
                .to_string(),
            invalid_elevation: "Elevation returned by the elevation service is not plausible"
                .to_string(),
            address_postal_code_required: "address or postalCode must be provided".to_string(),
            invalid_request: "Malformed request body: {reason}".to_string(),
        }
    }
}

impl MessageCatalog {
    /// Human-readable message for a validation failure. Internal failures
    /// never leak their detail and get the generic `unexpected` text.
    pub fn describe(&self, err: &AppError) -> String {
        match err {
            AppError::PostalCodeNotFound { .. } => self.postal_code_not_found.clone(),
            AppError::InvalidElevation { .. } => self.invalid_elevation.clone(),
            AppError::AltitudeExceedsRange { max_meters } => self
                .altitude_exceed
                .replace("{max}", &max_meters.to_string()),
            AppError::MissingInput => self.address_postal_code_required.clone(),
            AppError::InvalidRequest { reason } => self.invalid_request.replace("{reason}", reason),
            _ => self.unexpected.clone(),
        }
    }

    pub fn error_response(&self, err: &AppError) -> ErrorResponse {
        let error = match err.category() {
            ErrorCategory::Validation => self.validation.clone(),
            ErrorCategory::Configuration | ErrorCategory::Internal => self.internal_server.clone(),
        };

        ErrorResponse {
            error,
            message: self.describe(err),
        }
    }
}
