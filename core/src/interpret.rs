//! Response and error interpretation.
//!
//! Success bodies decode as a list when their first non-whitespace character
//! is `[`, otherwise as a single value; an empty body or a bare `null` is an
//! absent payload.
//! Error bodies are tried as a [`ValidationResult`] first and kept as raw text
//! when that fails. Decode failures are logged and folded into the returned
//! `RestResponse`; none of them reach the caller as `Err`.

use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::http::HttpResponse;
use crate::response::{ErrorPayload, Payload, RestResponse};
use crate::validation::ValidationResult;

/// Decode a success body.
pub fn decode_payload<T: DeserializeOwned>(raw: &str) -> Result<Option<Payload<T>>, serde_json::Error> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() || trimmed.trim_end() == "null" {
        return Ok(None);
    }
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map(|values| Some(Payload::Many(values)))
    } else {
        serde_json::from_str(trimmed).map(|value| Some(Payload::One(value)))
    }
}

/// Interpret a 2xx response.
///
/// A body that does not decode yields a failed `RestResponse` with the
/// observed status and the body text as message.
pub fn interpret_success<T: DeserializeOwned>(response: HttpResponse) -> RestResponse<T> {
    match decode_payload(&response.body) {
        Ok(body) => RestResponse::success(response.status, body, response.headers),
        Err(e) => {
            warn!(status = response.status, error = %e, "success body did not decode");
            RestResponse::failure(response.status, ErrorPayload::Message(response.body))
        }
    }
}

/// Interpret a non-2xx response.
pub fn interpret_failure<T>(status: u16, body: String) -> RestResponse<T> {
    match serde_json::from_str::<ValidationResult>(&body) {
        Ok(result) => RestResponse::failure(status, ErrorPayload::Validation(result)),
        Err(e) => {
            error!(status, error = %e, "error body is not a validation result");
            RestResponse::failure(status, ErrorPayload::Message(body))
        }
    }
}
