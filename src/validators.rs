//! Form Validators
//!
//! Side-effect-free rules over a single field value. Each rule reports at most
//! one error; field validators run every rule and keep all of them.

use std::fmt;

use serde::Serialize;

/// Minimum trimmed length of a task title
pub const TITLE_MIN_LENGTH: usize = 5;

/// Case-insensitive block-list for titles
pub const FORBIDDEN_KEYWORDS: &[&str] = &["spam", "test", "廣告"];

/// Structured validation failure for the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    Required,
    MinLength { required: usize, actual: usize },
    ForbiddenKeyword { keyword: String, value: String },
    RequiredContent,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required => write!(f, "This field is required"),
            ValidationError::MinLength { required, actual } => {
                write!(f, "Must be at least {} characters (currently {})", required, actual)
            }
            ValidationError::ForbiddenKeyword { keyword, .. } => {
                write!(f, "Must not contain \"{}\"", keyword)
            }
            ValidationError::RequiredContent => write!(f, "Content cannot be empty"),
        }
    }
}

/// Result of a single rule
pub type RuleResult = Result<(), ValidationError>;

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Fails on a missing or empty value (whitespace counts as content)
pub fn required(value: Option<&str>) -> RuleResult {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ValidationError::Required),
    }
}

/// Fails when the trimmed value is shorter than `min`
///
/// Empty values pass; `required` owns emptiness.
pub fn min_length(value: Option<&str>, min: usize) -> RuleResult {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    let actual = trimmed_len(value);
    if actual >= min {
        Ok(())
    } else {
        Err(ValidationError::MinLength { required: min, actual })
    }
}

/// Fails on the first block-listed keyword contained in the value
pub fn forbidden_keywords(value: Option<&str>) -> RuleResult {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    let lower = value.to_lowercase();
    match FORBIDDEN_KEYWORDS
        .iter()
        .find(|keyword| lower.contains(&keyword.to_lowercase()))
    {
        Some(keyword) => Err(ValidationError::ForbiddenKeyword {
            keyword: keyword.to_string(),
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}

/// Fails on a missing value or one that is blank after trimming
pub fn required_content(value: Option<&str>) -> RuleResult {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::RequiredContent),
    }
}

fn collect(results: impl IntoIterator<Item = RuleResult>) -> Vec<ValidationError> {
    results.into_iter().filter_map(Result::err).collect()
}

/// All triggered title rules, in application order
pub fn validate_title(value: &str) -> Vec<ValidationError> {
    let value = Some(value);
    collect([
        required(value),
        min_length(value, TITLE_MIN_LENGTH),
        forbidden_keywords(value),
    ])
}

pub fn validate_sub_task_content(value: &str) -> Vec<ValidationError> {
    collect([required_content(Some(value))])
}
