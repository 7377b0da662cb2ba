//! Request composition and the single HTTP exchange of a call.
//!
//! # Design
//! `build_request` is pure: it substitutes `{name}` placeholders in the route
//! template from the path and query bindings, appends the query bindings no
//! placeholder consumed, and serializes the body. A placeholder without a
//! binding is an error raised before any I/O. `dispatch` then performs exactly
//! one exchange through the [`Transport`] and splits the outcome into a 2xx
//! response or a [`DispatchError::Status`] carrying the status and raw body.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{InvokeError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::BoundArguments;
use crate::transport::Transport;

/// Everything needed to perform one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub base_url: String,
    pub method: HttpMethod,
    pub path_template: String,
    pub arguments: BoundArguments,
}

#[derive(Debug)]
pub enum DispatchError {
    /// The server answered with a non-2xx status.
    Status { status: u16, body: String },
    Transport(TransportError),
}

/// Compose the wire request for `descriptor`.
pub fn build_request(descriptor: &RequestDescriptor) -> Result<HttpRequest, InvokeError> {
    let args = &descriptor.arguments;
    let (path, consumed) = expand_template(&descriptor.path_template, args)?;

    let mut url = format!("{}{}", descriptor.base_url, path);
    append_query(&mut url, &args.query_values, &consumed);

    let (headers, body) = match &args.body {
        Some(value) => (
            vec![("content-type".to_string(), "application/json".to_string())],
            Some(serde_json::to_string(value)?),
        ),
        None => (Vec::new(), None),
    };

    Ok(HttpRequest {
        method: descriptor.method,
        url,
        headers,
        body,
    })
}

/// Perform the exchange. Non-2xx statuses become `DispatchError::Status`.
pub fn dispatch(transport: &dyn Transport, request: &HttpRequest) -> Result<HttpResponse, DispatchError> {
    debug!(method = %request.method, url = %request.url, "dispatching request");
    let response = transport
        .execute(request)
        .map_err(DispatchError::Transport)?;
    debug!(status = response.status, bytes = response.body.len(), "received response");

    if response.is_success() {
        Ok(response)
    } else {
        Err(DispatchError::Status {
            status: response.status,
            body: response.body,
        })
    }
}

/// Substitute placeholders; returns the expanded path and the query names it
/// consumed. A placeholder filled from a path binding leaves a query binding of
/// the same name to the query string.
fn expand_template(template: &str, args: &BoundArguments) -> Result<(String, Vec<String>), InvokeError> {
    let mut expanded = String::with_capacity(template.len());
    let mut consumed = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        expanded.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| InvokeError::MalformedTemplate {
            template: template.to_string(),
        })?;
        let name = &after[..close];
        let value = match args.path_values.get(name) {
            Some(value) => value,
            None => {
                let value = args.query_values.get(name).ok_or_else(|| InvokeError::UnboundPlaceholder {
                    placeholder: name.to_string(),
                    template: template.to_string(),
                })?;
                consumed.push(name.to_string());
                value
            }
        };
        expanded.push_str(&encode_component(&render(value)));
        rest = &after[close + 1..];
    }
    expanded.push_str(rest);
    Ok((expanded, consumed))
}

fn append_query(url: &mut String, query: &IndexMap<String, Value>, consumed: &[String]) {
    let mut separator = if url.contains('?') { '&' } else { '?' };
    for (name, value) in query {
        if consumed.iter().any(|c| c == name) {
            continue;
        }
        let values: Vec<&Value> = match value {
            Value::Null => continue,
            Value::Array(items) => items.iter().filter(|v| !v.is_null()).collect(),
            other => vec![other],
        };
        for value in values {
            let _ = write!(
                url,
                "{separator}{}={}",
                encode_component(name),
                encode_component(&render(value))
            );
            separator = '&';
        }
    }
}

/// Text form of a bound value: strings unquoted, `null` empty, containers as JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => {
                let _ = write!(encoded, "%{byte:02X}");
            }
        }
    }
    encoded
}
