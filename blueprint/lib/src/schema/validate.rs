//! Structural validation of untyped model replies.
//!
//! [`validate`] walks an arbitrary JSON value and reports every shape
//! violation it finds, each tagged with a JSON-path-like location, before
//! converting the value into an [`AbstractSchema`]. Cross-field rules (one
//! primary key per model, references pointing at real models) are not
//! enforced.

use std::fmt;

use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::types::{AbstractSchema, FieldType};

/// A single shape violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location of the offending value, e.g. `models[1].fields[0].type`.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The reply did not match the abstract schema shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema reply failed validation: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates `value` and converts it into a typed [`AbstractSchema`].
///
/// ## Errors
///
/// Returns a [`ValidationError`] enumerating every missing or mistyped
/// property when the value does not have the abstract schema shape.
///
/// ## Examples
///
/// ```
/// use blueprint_lib::schema::validate;
/// use serde_json::json;
///
/// let schema = validate(&json!({
///     "models": [{ "name": "users", "fields": [{ "name": "id", "type": "serial" }] }]
/// }))
/// .unwrap();
/// assert_eq!(schema.models[0].name, "users");
///
/// assert!(validate(&json!({ "models": [] })).is_err());
/// ```
pub fn validate(value: &Value) -> Result<AbstractSchema, ValidationError> {
    let mut issues = Vec::new();
    check_root(value, &mut issues);
    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    serde_json::from_value(value.clone()).map_err(|e| ValidationError {
        issues: vec![ValidationIssue::new("$", e.to_string())],
    })
}

/// Parses `text` as JSON and validates it.
///
/// ## Errors
///
/// Returns a [`ValidationError`] when the text is not JSON or fails [`validate`].
pub fn validate_str(text: &str) -> Result<AbstractSchema, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ValidationError {
        issues: vec![ValidationIssue::new("$", format!("not valid JSON: {e}"))],
    })?;
    validate(&value)
}

fn check_root(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(root) = value.as_object() else {
        issues.push(ValidationIssue::new("$", "expected an object"));
        return;
    };
    match root.get("models") {
        None => issues.push(ValidationIssue::new("models", "is required")),
        Some(Value::Array(models)) if models.is_empty() => {
            issues.push(ValidationIssue::new("models", "must contain at least one model"))
        }
        Some(Value::Array(models)) => {
            for (i, model) in models.iter().enumerate() {
                check_model(model, &format!("models[{i}]"), issues);
            }
        }
        Some(_) => issues.push(ValidationIssue::new("models", "expected an array")),
    }
}

fn check_model(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(model) = value.as_object() else {
        issues.push(ValidationIssue::new(path, "expected an object"));
        return;
    };
    require_string(model, "name", path, issues);
    match model.get("fields") {
        None => issues.push(ValidationIssue::new(format!("{path}.fields"), "is required")),
        Some(Value::Array(fields)) if fields.is_empty() => issues.push(ValidationIssue::new(
            format!("{path}.fields"),
            "must contain at least one field",
        )),
        Some(Value::Array(fields)) => {
            for (i, field) in fields.iter().enumerate() {
                check_field(field, &format!("{path}.fields[{i}]"), issues);
            }
        }
        Some(_) => issues.push(ValidationIssue::new(
            format!("{path}.fields"),
            "expected an array",
        )),
    }
}

fn check_field(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(field) = value.as_object() else {
        issues.push(ValidationIssue::new(path, "expected an object"));
        return;
    };
    require_string(field, "name", path, issues);

    match field.get("type") {
        None => issues.push(ValidationIssue::new(format!("{path}.type"), "is required")),
        Some(Value::String(ty)) if ty.parse::<FieldType>().is_err() => {
            issues.push(ValidationIssue::new(
                format!("{path}.type"),
                format!("'{ty}' is not one of {}", allowed_types()),
            ))
        }
        Some(Value::String(_)) => {}
        Some(_) => issues.push(ValidationIssue::new(format!("{path}.type"), "expected a string")),
    }

    for flag in ["primaryKey", "notNull", "unique"] {
        if let Some(v) = field.get(flag)
            && !v.is_boolean()
        {
            issues.push(ValidationIssue::new(format!("{path}.{flag}"), "expected a boolean"));
        }
    }

    if let Some(v) = field.get("default")
        && !v.is_string()
        && !v.is_null()
    {
        issues.push(ValidationIssue::new(format!("{path}.default"), "expected a string"));
    }

    match field.get("references") {
        None | Some(Value::Null) => {}
        Some(Value::Object(reference)) => {
            let ref_path = format!("{path}.references");
            require_string(reference, "model", &ref_path, issues);
            require_string(reference, "field", &ref_path, issues);
        }
        Some(_) => issues.push(ValidationIssue::new(
            format!("{path}.references"),
            "expected an object",
        )),
    }
}

fn require_string(obj: &Map<String, Value>, key: &str, path: &str, issues: &mut Vec<ValidationIssue>) {
    match obj.get(key) {
        Some(Value::String(_)) => {}
        Some(_) => issues.push(ValidationIssue::new(format!("{path}.{key}"), "expected a string")),
        None => issues.push(ValidationIssue::new(format!("{path}.{key}"), "is required")),
    }
}

fn allowed_types() -> String {
    FieldType::iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
