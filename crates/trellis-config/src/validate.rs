//! Validation helpers and parsing utilities for environment values.

use std::net::IpAddr;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse a TCP port, rejecting zero and non-numeric input.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidVar`] when the value is not an integer in `1..=65535`.
pub fn parse_port(name: &'static str, value: &str) -> ConfigResult<u16> {
    let port = value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(name, "not_an_integer", value))?;
    if port == 0 {
        return Err(invalid(name, "zero", value));
    }
    u16::try_from(port).map_err(|_| invalid(name, "out_of_range", value))
}

/// Parse a positive byte count.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidVar`] when the value is not a positive integer.
pub fn parse_byte_size(name: &'static str, value: &str) -> ConfigResult<usize> {
    let size = value
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid(name, "not_an_integer", value))?;
    if size == 0 {
        return Err(invalid(name, "zero", value));
    }
    Ok(size)
}

/// Parse an IP address for the listener.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidVar`] when the value is not an IPv4 or IPv6 address.
pub fn parse_ip(name: &'static str, value: &str) -> ConfigResult<IpAddr> {
    value
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| invalid(name, "not_an_ip_address", value))
}

/// Parse an absolute URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidVar`] when the value cannot be parsed as a URL.
pub fn parse_url(name: &'static str, value: &str) -> ConfigResult<Url> {
    Url::parse(value.trim()).map_err(|_| invalid(name, "not_a_url", value))
}

/// Interpret a flag value; `1`, `true`, `yes` and `on` (any case) are truthy.
#[must_use]
pub fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Split a comma-separated origin list, trimming entries and dropping empties.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidVar`] for a `*` entry; credentialed CORS
/// cannot answer with a wildcard origin.
pub fn parse_origins(name: &'static str, value: Option<&str>) -> ConfigResult<Vec<String>> {
    let Some(raw) = value else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                Err(invalid(name, "wildcard_with_credentials", raw))
            } else {
                Ok(origin.trim_end_matches('/').to_string())
            }
        })
        .collect()
}

fn invalid(name: &'static str, reason: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidVar {
        name,
        reason,
        value: Some(value.to_string()),
    }
}
