//! Declared client interfaces.
//!
//! # Design
//! An [`ApiDefinition`] is the static description of one remote interface:
//! the application it talks to, its interface-level mapping, and for each
//! method the method-level mapping, parameter roles, and return shape. It is
//! built once through [`ApiBuilder`] and never mutated afterwards. An api may
//! extend a base api; methods it re-declares inherit the base declaration's
//! mapping when they declare none of their own.

use indexmap::IndexMap;

use crate::params::ParamSpec;
use crate::route::{Mapping, RouteMetadata};
use crate::return_type::TypeShape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    name: String,
    route: RouteMetadata,
    params: Vec<ParamSpec>,
    returns: TypeShape,
}

impl MethodDefinition {
    /// A method with no mapping, no parameters, and an untyped JSON return.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            route: RouteMetadata::new(name),
            params: Vec::new(),
            returns: TypeShape::of::<serde_json::Value>(),
        }
    }

    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.route = self.route.with_mapping(mapping);
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, shape: TypeShape) -> Self {
        self.returns = shape;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> &RouteMetadata {
        &self.route
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn return_shape(&self) -> &TypeShape {
        &self.returns
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDefinition {
    name: String,
    application: String,
    route: RouteMetadata,
    methods: IndexMap<String, MethodDefinition>,
}

impl ApiDefinition {
    pub fn builder(name: &str, application: &str) -> ApiBuilder {
        ApiBuilder {
            name: name.to_string(),
            application: application.to_string(),
            route: RouteMetadata::new(name),
            methods: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical application name used for the base-URL lookup.
    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn route(&self) -> &RouteMetadata {
        &self.route
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.get(name)
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.values()
    }
}

#[derive(Debug)]
pub struct ApiBuilder {
    name: String,
    application: String,
    route: RouteMetadata,
    methods: IndexMap<String, MethodDefinition>,
}

impl ApiBuilder {
    /// Add an interface-level mapping.
    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.route = self.route.with_mapping(mapping);
        self
    }

    /// Inherit the interface-level mapping and the methods of `base`.
    pub fn extends(mut self, base: &ApiDefinition) -> Self {
        self.route.set_inherited(base.route.clone());
        for (name, inherited) in &base.methods {
            match self.methods.get_mut(name) {
                Some(own) => own.route.set_inherited(inherited.route.clone()),
                None => {
                    let element = format!("{}::{}", self.name, name);
                    let method = MethodDefinition {
                        route: RouteMetadata::new(&element).inheriting(inherited.route.clone()),
                        ..inherited.clone()
                    };
                    self.methods.insert(name.clone(), method);
                }
            }
        }
        self
    }

    /// Declare a method, replacing any inherited method of the same name.
    pub fn method(mut self, mut method: MethodDefinition) -> Self {
        let base = self.methods.get(&method.name).map(|m| m.route.clone());
        method.route = method.route.renamed(&format!("{}::{}", self.name, method.name));
        if let Some(base) = base {
            method.route.set_inherited(base);
        }
        self.methods.insert(method.name.clone(), method);
        self
    }

    pub fn build(self) -> ApiDefinition {
        ApiDefinition {
            name: self.name,
            application: self.application,
            route: self.route,
            methods: self.methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::route::resolve_route;

    fn base() -> ApiDefinition {
        ApiDefinition::builder("BaseApi", "")
            .mapping(Mapping::request("/base"))
            .method(MethodDefinition::new("remove").mapping(Mapping::delete("/{id}")).param(ParamSpec::path("id")))
            .method(MethodDefinition::new("list").mapping(Mapping::get("")))
            .build()
    }

    #[test]
    fn methods_keep_declaration_order() {
        let api = base();
        let names: Vec<&str> = api.methods().map(MethodDefinition::name).collect();
        assert_eq!(names, ["remove", "list"]);
    }

    #[test]
    fn extending_copies_methods_under_new_interface_path() {
        let api = ApiDefinition::builder("WidgetApi", "inventory")
            .mapping(Mapping::request("/api/widgets"))
            .extends(&base())
            .build();
        let remove = api.method("remove").unwrap();
        assert_eq!(remove.route().element(), "WidgetApi::remove");
        let route = resolve_route(api.route(), remove.route()).unwrap();
        assert_eq!(route.method, HttpMethod::Delete);
        assert_eq!(route.path, "/api/widgets/{id}");
    }

    #[test]
    fn interface_mapping_is_inherited_when_absent() {
        let api = ApiDefinition::builder("Derived", "svc").extends(&base()).build();
        assert_eq!(api.route().resolve().unwrap().path, "/base");
    }

    #[test]
    fn redeclared_method_without_mapping_inherits_it() {
        let api = ApiDefinition::builder("WidgetApi", "inventory")
            .mapping(Mapping::request("/w"))
            .extends(&base())
            .method(MethodDefinition::new("list").param(ParamSpec::query("page")))
            .build();
        let list = api.method("list").unwrap();
        assert_eq!(list.params().len(), 1);
        let route = resolve_route(api.route(), list.route()).unwrap();
        assert_eq!(route.method, HttpMethod::Get);
        assert_eq!(route.path, "/w");
    }

    #[test]
    fn method_declared_before_extends_still_inherits() {
        let api = ApiDefinition::builder("WidgetApi", "inventory")
            .mapping(Mapping::request("/w"))
            .method(MethodDefinition::new("remove").param(ParamSpec::path("id")))
            .extends(&base())
            .build();
        let route = resolve_route(api.route(), api.method("remove").unwrap().route()).unwrap();
        assert_eq!(route.path, "/w/{id}");
    }
}
