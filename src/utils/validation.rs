use crate::domain::model::AddressRequest;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AppError, Result};
use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

const DATASET_EXTENSIONS: &[&str] = &["json", "csv"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for AddressRequest {
    /// 地址與郵遞區號至少要有一個非空白
    fn validate(&self) -> Result<()> {
        let present = |value: &Option<String>| {
            value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
        };

        if present(&self.address) || present(&self.postal_code) {
            Ok(())
        } else {
            Err(AppError::MissingInput)
        }
    }
}

/// Checks every setting a [`ConfigProvider`] exposes, whatever its source.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_socket_address("server.bind", config.bind_address())?;
    validate_url("api.nominatim_url", config.nominatim_url())?;
    validate_url("api.elevation_url", config.elevation_url())?;
    validate_non_empty_string("api.user_agent", config.user_agent())?;
    validate_range(
        "api.timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        300,
    )?;

    for (field, path) in [
        ("datasets.temperatures", config.temperatures_dataset()),
        ("datasets.offsets", config.offsets_dataset()),
    ] {
        validate_path(field, path)?;
        validate_file_extension(field, path, DATASET_EXTENSIONS)?;
    }

    tracing::debug!("Configuration validation passed");
    Ok(())
}

pub fn validate_socket_address(field_name: &str, value: &str) -> Result<()> {
    value
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Expected host:port, {}", e),
        })
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
