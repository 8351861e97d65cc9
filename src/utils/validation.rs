use crate::utils::error::{DashboardError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DashboardError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DashboardError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DashboardError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DashboardError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Case-insensitive membership check against a fixed vocabulary; returns the
/// canonical spelling so queries always carry the value the API expects.
pub fn validate_vocabulary(field_name: &str, value: &str, vocabulary: &[&str]) -> Result<String> {
    let needle = value.trim().to_lowercase();
    vocabulary
        .iter()
        .find(|candidate| candidate.to_lowercase() == needle)
        .map(|candidate| candidate.to_string())
        .ok_or_else(|| DashboardError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("not a recognized value; expected one of: {}", vocabulary.join(", ")),
        })
}
