//! Input validation for weight entries, settings and push subscriptions.

use std::fmt;

use chrono::NaiveDate;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range.
    OutOfRange { field: &'static str, min: f64, max: f64, actual: f64 },
    /// Date is not a `YYYY-MM-DD` calendar day.
    InvalidDate(String),
    /// Reminder hour outside 0-23.
    InvalidHour(i64),
    /// Push endpoint is not an HTTP(S) URL.
    InvalidEndpoint(String),
    /// Empty value where one is required.
    Empty(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, min, max, actual } => {
                write!(f, "{} must be between {} and {} (got {})", field, min, max, actual)
            }
            ValidationError::InvalidDate(value) => {
                write!(f, "Invalid date '{}': expected YYYY-MM-DD", value)
            }
            ValidationError::InvalidHour(hour) => {
                write!(f, "Invalid reminder hour {}: expected 0-23", hour)
            }
            ValidationError::InvalidEndpoint(value) => {
                write!(f, "Invalid push endpoint '{}'", value)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Heaviest weight accepted, in kilograms.
pub const MAX_WEIGHT_KG: f64 = 1000.0;

/// Tallest height accepted, in centimeters.
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// Validate a body weight in kilograms. Must be positive.
pub fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    positive_at_most("weight", weight, MAX_WEIGHT_KG)
}

/// Validate an optional body fat percentage.
pub fn validate_body_fat(body_fat: Option<f64>) -> Result<(), ValidationError> {
    match body_fat {
        Some(value) if !value.is_finite() || !(0.0..=100.0).contains(&value) => {
            Err(ValidationError::OutOfRange {
                field: "body_fat",
                min: 0.0,
                max: 100.0,
                actual: value,
            })
        }
        _ => Ok(()),
    }
}

/// Validate a calendar day in `YYYY-MM-DD` form.
pub fn validate_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Validate a height in centimeters.
pub fn validate_height(height: f64) -> Result<(), ValidationError> {
    positive_at_most("height", height, MAX_HEIGHT_CM)
}

/// Validate a target weight in kilograms.
pub fn validate_target_weight(target: f64) -> Result<(), ValidationError> {
    positive_at_most("target_weight", target, MAX_WEIGHT_KG)
}

/// Validate a reminder hour (0-23).
pub fn validate_hour(hour: i64) -> Result<(), ValidationError> {
    if (0..=23).contains(&hour) {
        Ok(())
    } else {
        Err(ValidationError::InvalidHour(hour))
    }
}

/// Validate a push subscription's endpoint and keys.
pub fn validate_subscription(endpoint: &str, p256dh: &str, auth: &str) -> Result<(), ValidationError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ValidationError::Empty("endpoint"));
    }
    let host = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => {}
        _ => return Err(ValidationError::InvalidEndpoint(endpoint.to_string())),
    }
    if p256dh.trim().is_empty() {
        return Err(ValidationError::Empty("p256dh"));
    }
    if auth.trim().is_empty() {
        return Err(ValidationError::Empty("auth"));
    }
    Ok(())
}

fn positive_at_most(field: &'static str, value: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: 0.0,
            max,
            actual: value,
        })
    }
}
