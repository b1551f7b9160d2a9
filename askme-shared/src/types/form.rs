use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::errors::AppError;

/// One reason a form field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: String,
    pub message: String,
}

/// Rejection reasons keyed by form field name.
///
/// Rules are additive: every failing rule contributes an entry, and a form is
/// accepted only when the map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<FieldError>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(FieldError {
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[FieldError] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `field` was rejected with `code`.
    pub fn has(&self, field: &str, code: &str) -> bool {
        self.get(field).iter().any(|e| e.code == code)
    }

    /// `Ok(())` when nothing was rejected, otherwise a validation error.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", err.code));
                out.add(field, err.code.to_string(), message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.0 {
            for err in errors {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {}", err.message)?;
                first = false;
            }
        }
        Ok(())
    }
}
