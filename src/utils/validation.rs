//! Centralized validation and helper functions.

/// Maximum number of records accepted from a single catalog source (DOS protection)
pub const MAX_RECORDS: usize = 100_000;

/// Maximum length in bytes of a text accepted for annotation over HTTP
pub const MAX_TEXT_LENGTH: usize = 1024 * 1024; // 1MB

/// Parse an age or uncertainty value.
///
/// Blank, unparseable, and non-finite values are all unknown. They are never
/// turned into `0`.
///
/// # Examples
///
/// ```
/// use geochron::utils::validation::parse_age;
///
/// assert_eq!(parse_age("201.3"), Some(201.3));
/// assert_eq!(parse_age(" 0 "), Some(0.0));
/// assert_eq!(parse_age(""), None);
/// assert_eq!(parse_age("~237"), None);
/// assert_eq!(parse_age("NaN"), None);
/// ```
#[must_use]
pub fn parse_age(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Input validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text too long: {0} bytes exceeds {MAX_TEXT_LENGTH}")]
    TextTooLong(usize),
    #[error("Text contains a null byte")]
    NullByte,
}

/// Validate text submitted for annotation.
///
/// # Errors
///
/// Returns `ValidationError::TextTooLong` if the text exceeds `MAX_TEXT_LENGTH`
/// bytes, or `ValidationError::NullByte` if it contains `\0`.
pub fn validate_text(text: &str) -> Result<&str, ValidationError> {
    if text.len() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TextTooLong(text.len()));
    }
    if text.contains('\0') {
        return Err(ValidationError::NullByte);
    }
    Ok(text)
}
