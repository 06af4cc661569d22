use crate::{ApiError, ApiRequest};

/// Treat empty strings like absent values.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

pub fn require_path_id(request: &ApiRequest) -> Result<&str, ApiError> {
    non_empty(request.path_parameter("id"))
        .ok_or_else(|| ApiError::bad_request("Missing path parameter: id"))
}

/// Read a page size leniently: leading whitespace, an optional sign, then as many
/// digits as follow (`"7abc"` reads as 7). Nothing numeric or zero falls back to
/// `default`; a negative value is rejected.
pub fn parse_limit(raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() || digits.bytes().all(|b| b == b'0') {
        return Ok(default);
    }
    if negative {
        return Err(ApiError::bad_request("Invalid limit"));
    }

    Ok(digits.parse::<u32>().unwrap_or(u32::MAX))
}
