//! Error types for the rest proxy.
//!
//! # Design
//! Only defects in the declared metadata or in how a method is called become
//! `Err` values for the caller. Remote failures (non-2xx statuses, bodies that
//! fail to decode) are folded into [`RestResponse`](crate::RestResponse) by the
//! interpreter and never show up here. `Transport` is the one exception: a
//! connection that never produced a status has nothing to fold.

use thiserror::Error;

/// Errors raised synchronously by an invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Neither the element nor anything it inherits from declares a mapping.
    #[error("no request mapping found on {element}")]
    NoRouteFound { element: String },

    #[error("api `{api}` has no method `{method}`")]
    UnknownMethod { api: String, method: String },

    #[error("method `{method}` declares {expected} parameters but was called with {actual}")]
    ArgumentCountMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// A `{name}` placeholder in the route template has no path or query binding.
    #[error("placeholder `{{{placeholder}}}` in `{template}` has no binding")]
    UnboundPlaceholder { placeholder: String, template: String },

    #[error("route template `{template}` has an unterminated placeholder")]
    MalformedTemplate { template: String },

    /// The caller asked for a payload type the method does not declare.
    #[error("method `{method}` returns `{declared}`, not `{requested}`")]
    ReturnTypeMismatch {
        method: String,
        declared: String,
        requested: &'static str,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A call argument or request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures below the HTTP status line: DNS, connect, TLS, broken bodies.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http transport failed: {0}")]
    Ureq(#[from] ureq::Error),

    #[error("http transport failed: {0}")]
    Other(String),
}

/// Errors from the application registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no base url registered for application `{0}`")]
    UnknownApplication(String),

    #[error("invalid registry document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}
