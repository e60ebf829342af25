use crate::utils::error::{CartError, Result};
use std::fmt::Display;
use std::ops::RangeInclusive;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> CartError {
    CartError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Catalog base URL: http(s) with a host. Lookup paths are appended to it, so
/// a query string or fragment would end up in the middle of every request.
pub fn validate_url(field: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, raw, format!("Unsupported URL scheme: {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, raw, "URL has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(field, raw, "URL must not carry a query or fragment"));
    }
    Ok(())
}

/// Relative path joined onto the base URL ahead of the product id.
pub fn validate_path_segment(field: &str, segment: &str) -> Result<()> {
    let trimmed = segment.trim_matches('/');
    if trimmed.is_empty() {
        return Err(invalid(field, segment, "Path segment cannot be empty"));
    }
    match trimmed.chars().find(|c| c.is_whitespace() || matches!(c, '?' | '#')) {
        Some(c) => Err(invalid(field, segment, format!("Path segment contains {:?}", c))),
        None => Ok(()),
    }
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        Err(invalid(field, path, "Path cannot be empty"))
    } else if path.contains('\0') {
        Err(invalid(field, path.escape_default(), "Path contains null bytes"))
    } else {
        Ok(())
    }
}

pub fn validate_range<T>(field: &str, value: T, allowed: RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + Display,
{
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field,
            &value,
            format!("Value must be between {} and {}", allowed.start(), allowed.end()),
        ))
    }
}

pub fn validate_non_empty_string(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}
