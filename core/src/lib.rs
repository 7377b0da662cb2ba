//! Declarative REST api clients.
//!
//! # Overview
//! An api is declared once as data: the application it talks to, an
//! interface-level mapping, and per method a verb and path template, the
//! binding role of each parameter, and the declared return shape. Calls then
//! go through a single generic interceptor that builds the HTTP request,
//! performs one blocking exchange, and folds the response into a
//! [`RestResponse`].
//!
//! # Design
//! - Metadata is static. [`RestApiProxy`] resolves every method into a route
//!   table when it is built; [`RestClient::invoke`] resolves per call.
//! - Hand-written adapters such as [`CrudClient`] give a typed surface over
//!   the generic `call`.
//! - Remote failures never become `Err`: non-2xx statuses turn into a failed
//!   `RestResponse` carrying either a [`ValidationResult`] or the raw body.
//!   Only metadata defects and connection failures are errors.
//! - The exchange sits behind [`Transport`]; [`UreqTransport`] is the default.

pub mod api;
pub mod client;
pub mod crud;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod interpret;
pub mod params;
pub mod registry;
pub mod response;
pub mod return_type;
pub mod route;
pub mod transport;
pub mod validation;

pub use api::{ApiBuilder, ApiDefinition, MethodDefinition};
pub use client::{ResolvedMethod, RestApiProxy, RestClient};
pub use crud::{crud_rest_api, CrudClient};
pub use error::{InvokeError, RegistryError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{BindingRole, ParamSpec, ParameterBinding};
pub use registry::ApplicationRegistry;
pub use response::{ErrorPayload, Outcome, Payload, RestResponse};
pub use return_type::{ElementType, TypeShape};
pub use route::{Mapping, RouteDescriptor, RouteMetadata};
pub use transport::{Transport, UreqTransport};
pub use validation::{FieldError, GlobalError, ValidationResult};
