//! Structured validation errors returned by failing calls.
//!
//! Wire shape:
//! `{"fieldErrors":[{"fieldName":"name","message":"required"}],"globalErrors":[{"message":"..."}]}`.
//! Unknown keys are rejected so that arbitrary JSON error bodies fall back to
//! the raw message instead of decoding as an empty result.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    field_errors: Vec<FieldError>,
    #[serde(default, deserialize_with = "null_as_empty")]
    global_errors: Vec<GlobalError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldError {
    pub field_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalError {
    pub message: String,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field_error(&mut self, field_name: &str, message: &str) {
        self.field_errors.push(FieldError {
            field_name: field_name.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_global_error(&mut self, message: &str) {
        self.global_errors.push(GlobalError {
            message: message.to_string(),
        });
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn global_errors(&self) -> &[GlobalError] {
        &self.global_errors
    }

    pub fn has_field_error(&self) -> bool {
        !self.field_errors.is_empty()
    }

    pub fn has_global_error(&self) -> bool {
        !self.global_errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_field_error() && !self.has_global_error()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
