//! Path template rendering
//!
//! Handles `{param}` placeholders in operation paths, e.g.
//! `/zones/{zone_id}/dns_records/{record_id}`. Every placeholder must be
//! supplied with a non-empty value before a request is attempted.

use crate::error::{Error, Result};
use crate::types::StringMap;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {param_name}
static PARAM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Extract all placeholder names from a path template, in order of appearance
pub fn extract_params(template: &str) -> Vec<String> {
    PARAM_REGEX
        .captures_iter(template)
        .map(|cap| cap.get(1).unwrap().as_str().to_string())
        .collect()
}

/// Check if a path template contains placeholders
pub fn has_params(template: &str) -> bool {
    PARAM_REGEX.is_match(template)
}

/// Render a path template with the given parameter values.
///
/// Fails with a validation error naming the parameter when a placeholder is
/// missing from `params`, empty, or not a safe path segment. This guards
/// against sending malformed URLs.
pub fn render_path(template: &str, params: &StringMap) -> Result<String> {
    let mut result = template.to_string();

    for cap in PARAM_REGEX.captures_iter(template) {
        let full_match = cap.get(0).unwrap().as_str();
        let name = cap.get(1).unwrap().as_str();

        let value = params
            .get(name)
            .ok_or_else(|| Error::validation(name, "missing required path parameter"))?;

        validate_segment(name, value)?;
        result = result.replace(full_match, value);
    }

    Ok(result)
}

/// Validate that a path parameter value is a usable path segment
pub fn validate_segment(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(name, "must not be empty"));
    }
    if value.contains(['/', '?', '#', '%', ' ']) {
        return Err(Error::validation(
            name,
            "must not contain '/', '?', '#', '%' or whitespace",
        ));
    }
    Ok(())
}
