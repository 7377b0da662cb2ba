//! Route descriptor resolution.
//!
//! # Design
//! Routing metadata is declared as a list of [`Mapping`] values per element
//! (an api interface or one of its methods). Resolution probes the verb
//! shorthands in a fixed order (GET, POST, PUT, DELETE, PATCH) before the
//! generic request mapping, then walks the inherited declarations when the
//! element itself declares nothing. Interface-level and method-level
//! descriptors are resolved independently and joined by concatenating paths.

use crate::error::InvokeError;
use crate::http::HttpMethod;

/// One routing declaration.
///
/// The shorthand variants fix the verb. `Request` carries an explicit verb
/// list: empty means GET, otherwise the first verb is used. In every variant
/// only the first path is used, and no path means the empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    Get(Vec<String>),
    Post(Vec<String>),
    Put(Vec<String>),
    Delete(Vec<String>),
    Patch(Vec<String>),
    Request {
        paths: Vec<String>,
        methods: Vec<HttpMethod>,
    },
}

impl Mapping {
    pub fn get(path: &str) -> Self {
        Mapping::Get(vec![path.to_string()])
    }

    pub fn post(path: &str) -> Self {
        Mapping::Post(vec![path.to_string()])
    }

    pub fn put(path: &str) -> Self {
        Mapping::Put(vec![path.to_string()])
    }

    pub fn delete(path: &str) -> Self {
        Mapping::Delete(vec![path.to_string()])
    }

    pub fn patch(path: &str) -> Self {
        Mapping::Patch(vec![path.to_string()])
    }

    /// Generic mapping with no explicit verbs (resolves to GET).
    pub fn request(path: &str) -> Self {
        Mapping::Request {
            paths: vec![path.to_string()],
            methods: Vec::new(),
        }
    }

    /// Generic mapping with an explicit verb list.
    pub fn request_with(path: &str, methods: &[HttpMethod]) -> Self {
        Mapping::Request {
            paths: vec![path.to_string()],
            methods: methods.to_vec(),
        }
    }

    fn kind(&self) -> MappingKind {
        match self {
            Mapping::Get(_) => MappingKind::Get,
            Mapping::Post(_) => MappingKind::Post,
            Mapping::Put(_) => MappingKind::Put,
            Mapping::Delete(_) => MappingKind::Delete,
            Mapping::Patch(_) => MappingKind::Patch,
            Mapping::Request { .. } => MappingKind::Request,
        }
    }

    fn descriptor(&self) -> RouteDescriptor {
        let (method, paths) = match self {
            Mapping::Get(paths) => (HttpMethod::Get, paths),
            Mapping::Post(paths) => (HttpMethod::Post, paths),
            Mapping::Put(paths) => (HttpMethod::Put, paths),
            Mapping::Delete(paths) => (HttpMethod::Delete, paths),
            Mapping::Patch(paths) => (HttpMethod::Patch, paths),
            Mapping::Request { paths, methods } => {
                (methods.first().copied().unwrap_or(HttpMethod::Get), paths)
            }
        };
        RouteDescriptor {
            method,
            path: paths.first().cloned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MappingKind {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Request,
}

const PROBE_ORDER: [MappingKind; 6] = [
    MappingKind::Get,
    MappingKind::Post,
    MappingKind::Put,
    MappingKind::Delete,
    MappingKind::Patch,
    MappingKind::Request,
];

/// Routing declarations of one element, plus what it inherits.
///
/// `inherited` models an overridden declaration: a method re-declared by a
/// derived api keeps the mapping of the base declaration unless it declares
/// its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMetadata {
    element: String,
    mappings: Vec<Mapping>,
    inherited: Option<Box<RouteMetadata>>,
}

impl RouteMetadata {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            mappings: Vec::new(),
            inherited: None,
        }
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn inheriting(mut self, base: RouteMetadata) -> Self {
        self.inherited = Some(Box::new(base));
        self
    }

    pub(crate) fn renamed(mut self, element: &str) -> Self {
        self.element = element.to_string();
        self
    }

    pub(crate) fn set_inherited(&mut self, base: RouteMetadata) {
        self.inherited = Some(Box::new(base));
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Resolve the effective verb and path of this element.
    pub fn resolve(&self) -> Result<RouteDescriptor, InvokeError> {
        let mut current = Some(self);
        while let Some(metadata) = current {
            if let Some(mapping) = metadata.find_mapping() {
                return Ok(mapping.descriptor());
            }
            current = metadata.inherited.as_deref();
        }
        Err(InvokeError::NoRouteFound {
            element: self.element.clone(),
        })
    }

    fn find_mapping(&self) -> Option<&Mapping> {
        PROBE_ORDER
            .iter()
            .find_map(|kind| self.mappings.iter().find(|m| m.kind() == *kind))
    }
}

/// Resolved HTTP verb and path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDescriptor {
    pub method: HttpMethod,
    pub path: String,
}

/// Resolve the full route of `method` declared on an api described by `api`.
///
/// The verb comes from the method; the template is the api path followed by
/// the method path.
pub fn resolve_route(
    api: &RouteMetadata,
    method: &RouteMetadata,
) -> Result<RouteDescriptor, InvokeError> {
    let api_level = api.resolve()?;
    let method_level = method.resolve()?;
    Ok(RouteDescriptor {
        method: method_level.method,
        path: format!("{}{}", api_level.path, method_level.path),
    })
}
