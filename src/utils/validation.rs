use crate::utils::error::{GuardError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GuardError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, path: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    if let Some(extension) = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        if !allowed_set.contains(extension) {
            return Err(GuardError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: path.to_string(),
                reason: format!(
                    "Unsupported file extension: {}. Allowed extensions: {}",
                    extension,
                    allowed_extensions.join(", ")
                ),
            });
        }
        Ok(())
    } else {
        Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        })
    }
}

pub fn validate_key_list(field_name: &str, keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        return Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one key is required".to_string(),
        });
    }

    for key in keys {
        if key.trim().is_empty() {
            return Err(GuardError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: key.clone(),
                reason: "Key entries cannot be empty or whitespace-only".to_string(),
            });
        }

        if key.chars().any(char::is_whitespace) {
            return Err(GuardError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: key.clone(),
                reason: "Key entries cannot contain whitespace".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GuardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
