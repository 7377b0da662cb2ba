//! The uniform result of an invocation.
//!
//! # Design
//! A `RestResponse` always carries the status the transport observed. The
//! outcome is either a success with an optional payload and the response
//! headers, or a failure with exactly one of a structured validation result
//! or the raw body text. A payload and an error are never present together.

use crate::validation::ValidationResult;

/// Decoded success payload. Bodies starting with `[` decode to `Many`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Payload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Payload::One(value) => vec![value],
            Payload::Many(values) => values,
        }
    }

    pub fn as_one(&self) -> Option<&T> {
        match self {
            Payload::One(value) => Some(value),
            Payload::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[T]> {
        match self {
            Payload::One(_) => None,
            Payload::Many(values) => Some(values),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPayload {
    Validation(ValidationResult),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success {
        body: Option<Payload<T>>,
        headers: Vec<(String, String)>,
    },
    Failure(ErrorPayload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse<T> {
    status: u16,
    outcome: Outcome<T>,
}

impl<T> RestResponse<T> {
    pub fn success(status: u16, body: Option<Payload<T>>, headers: Vec<(String, String)>) -> Self {
        Self {
            status,
            outcome: Outcome::Success { body, headers },
        }
    }

    pub fn failure(status: u16, error: ErrorPayload) -> Self {
        Self {
            status,
            outcome: Outcome::Failure(error),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome<T> {
        self.outcome
    }

    pub fn body(&self) -> Option<&Payload<T>> {
        match &self.outcome {
            Outcome::Success { body, .. } => body.as_ref(),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_body(self) -> Option<Payload<T>> {
        match self.outcome {
            Outcome::Success { body, .. } => body,
            Outcome::Failure(_) => None,
        }
    }

    /// Response headers; empty for failures.
    pub fn headers(&self) -> &[(String, String)] {
        match &self.outcome {
            Outcome::Success { headers, .. } => headers,
            Outcome::Failure(_) => &[],
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn validation_result(&self) -> Option<&ValidationResult> {
        match &self.outcome {
            Outcome::Failure(ErrorPayload::Validation(result)) => Some(result),
            _ => None,
        }
    }

    pub fn response_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure(ErrorPayload::Message(message)) => Some(message),
            _ => None,
        }
    }
}
