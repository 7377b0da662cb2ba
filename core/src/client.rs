//! Invocation of declared api methods.
//!
//! # Design
//! `RestClient` is the per-call interceptor: resolve the route, bind the
//! arguments, resolve the return element type, build and dispatch the request,
//! then interpret the response. It holds only the application registry and a
//! shared transport and carries no state between calls.
//!
//! `RestApiProxy` binds one [`ApiDefinition`] to a client and resolves every
//! method up front into a route table, so a missing mapping is reported when
//! the proxy is built and calls only look entries up.
//!
//! Metadata defects and connection failures are `Err`. Any response that came
//! back with a status, whatever that status, is `Ok(RestResponse)`.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiDefinition, MethodDefinition};
use crate::dispatch::{build_request, dispatch, DispatchError, RequestDescriptor};
use crate::error::InvokeError;
use crate::interpret::{interpret_failure, interpret_success};
use crate::params::{bind, BoundArguments, ParamSpec};
use crate::registry::ApplicationRegistry;
use crate::response::RestResponse;
use crate::return_type::{resolve_element_type, ElementType};
use crate::route::{resolve_route, RouteDescriptor};
use crate::transport::{Transport, UreqTransport};

/// Static metadata of one method, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod {
    pub name: String,
    pub route: RouteDescriptor,
    pub params: Vec<ParamSpec>,
    pub element_type: ElementType,
}

impl ResolvedMethod {
    pub fn resolve(api: &ApiDefinition, method: &MethodDefinition) -> Result<Self, InvokeError> {
        Ok(Self {
            name: method.name().to_string(),
            route: resolve_route(api.route(), method.route())?,
            params: method.params().to_vec(),
            element_type: resolve_element_type(method.return_shape()),
        })
    }
}

/// Shared, stateless invoker.
#[derive(Clone)]
pub struct RestClient {
    registry: Arc<ApplicationRegistry>,
    transport: Arc<dyn Transport>,
}

impl RestClient {
    pub fn new(registry: ApplicationRegistry, transport: impl Transport + 'static) -> Self {
        Self {
            registry: Arc::new(registry),
            transport: Arc::new(transport),
        }
    }

    /// Client over a default [`UreqTransport`].
    pub fn with_registry(registry: ApplicationRegistry) -> Self {
        Self::new(registry, UreqTransport::new())
    }

    pub fn registry(&self) -> &ApplicationRegistry {
        &self.registry
    }

    /// Invoke `method` of `api`, resolving its metadata for this call only.
    ///
    /// `T` is the payload element type; it must match the method's declared
    /// return element type, or be `serde_json::Value`.
    pub fn invoke<T>(&self, api: &ApiDefinition, method: &str, args: &[Value]) -> Result<RestResponse<T>, InvokeError>
    where
        T: DeserializeOwned + 'static,
    {
        let definition = api.method(method).ok_or_else(|| InvokeError::UnknownMethod {
            api: api.name().to_string(),
            method: method.to_string(),
        })?;
        let resolved = ResolvedMethod::resolve(api, definition)?;
        self.execute(api.application(), &resolved, args)
    }

    pub(crate) fn execute<T>(
        &self,
        application: &str,
        method: &ResolvedMethod,
        args: &[Value],
    ) -> Result<RestResponse<T>, InvokeError>
    where
        T: DeserializeOwned + 'static,
    {
        if !method.element_type.accepts::<T>() {
            return Err(InvokeError::ReturnTypeMismatch {
                method: method.name.clone(),
                declared: method.element_type.name().to_string(),
                requested: type_name::<T>(),
            });
        }

        let base_url = self.registry.base_url(application)?;
        let bindings = bind(&method.name, &method.params, args)?;
        let descriptor = RequestDescriptor {
            base_url: base_url.to_string(),
            method: method.route.method,
            path_template: method.route.path.clone(),
            arguments: BoundArguments::from_bindings(bindings),
        };
        let request = build_request(&descriptor)?;

        match dispatch(self.transport.as_ref(), &request) {
            Ok(response) => Ok(interpret_success(response)),
            Err(DispatchError::Status { status, body }) => Ok(interpret_failure(status, body)),
            Err(DispatchError::Transport(e)) => Err(e.into()),
        }
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// A client bound to one api with its routes resolved ahead of time.
#[derive(Debug, Clone)]
pub struct RestApiProxy {
    api: ApiDefinition,
    client: RestClient,
    routes: HashMap<String, ResolvedMethod>,
}

impl RestApiProxy {
    /// Resolve every method of `api`. Fails on the first method without a
    /// discoverable mapping.
    pub fn new(api: ApiDefinition, client: RestClient) -> Result<Self, InvokeError> {
        let routes = api
            .methods()
            .map(|method| {
                let resolved = ResolvedMethod::resolve(&api, method)?;
                Ok::<_, InvokeError>((method.name().to_string(), resolved))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { api, client, routes })
    }

    pub fn api(&self) -> &ApiDefinition {
        &self.api
    }

    pub fn resolved(&self, method: &str) -> Option<&ResolvedMethod> {
        self.routes.get(method)
    }

    pub fn call<T>(&self, method: &str, args: &[Value]) -> Result<RestResponse<T>, InvokeError>
    where
        T: DeserializeOwned + 'static,
    {
        let resolved = self.routes.get(method).ok_or_else(|| InvokeError::UnknownMethod {
            api: self.api.name().to_string(),
            method: method.to_string(),
        })?;
        self.client.execute(self.api.application(), resolved, args)
    }
}
