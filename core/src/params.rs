//! Parameter binding.
//!
//! Each declared parameter may carry a path-variable name, a query-parameter
//! name, and a body marker. The binder classifies it under the highest of
//! those roles (path > query > body) and pairs it with the positional argument
//! of the call. Parameters with no role are dropped; they exist to let adapter
//! methods take context arguments that never reach the wire.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::InvokeError;

/// Declared binding roles of one method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub path_variable: Option<String>,
    pub query_param: Option<String>,
    pub body: bool,
}

impl ParamSpec {
    pub fn path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path_variable: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn query(name: &str) -> Self {
        Self {
            name: name.to_string(),
            query_param: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn body(name: &str) -> Self {
        Self {
            name: name.to_string(),
            body: true,
            ..Self::default()
        }
    }

    /// A parameter with no binding role.
    pub fn unbound(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn role(&self) -> Option<BindingRole> {
        if self.path_variable.is_some() {
            Some(BindingRole::PathVariable)
        } else if self.query_param.is_some() {
            Some(BindingRole::QueryParameter)
        } else if self.body {
            Some(BindingRole::Body)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingRole {
    PathVariable,
    QueryParameter,
    Body,
}

/// One parameter classified and paired with its runtime value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    pub role: BindingRole,
    /// Empty for `Body`.
    pub name: String,
    pub value: Value,
}

/// Bindings of one call, grouped the way the dispatcher consumes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    pub path_values: IndexMap<String, Value>,
    pub query_values: IndexMap<String, Value>,
    pub body: Option<Value>,
}

/// Classify `params` and pair them with `args`.
pub fn bind(
    method: &str,
    params: &[ParamSpec],
    args: &[Value],
) -> Result<Vec<ParameterBinding>, InvokeError> {
    if params.len() != args.len() {
        return Err(InvokeError::ArgumentCountMismatch {
            method: method.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }

    let bindings = params
        .iter()
        .zip(args)
        .filter_map(|(param, value)| {
            let role = param.role()?;
            let name = match role {
                BindingRole::PathVariable => param.path_variable.clone(),
                BindingRole::QueryParameter => param.query_param.clone(),
                BindingRole::Body => None,
            }
            .unwrap_or_default();
            Some(ParameterBinding {
                role,
                name,
                value: value.clone(),
            })
        })
        .collect();
    Ok(bindings)
}

impl BoundArguments {
    /// Group bindings by role. The first body binding wins; a later binding
    /// of an already seen name replaces the earlier value.
    pub fn from_bindings(bindings: Vec<ParameterBinding>) -> Self {
        let mut grouped = Self::default();
        for binding in bindings {
            match binding.role {
                BindingRole::PathVariable => {
                    grouped.path_values.insert(binding.name, binding.value);
                }
                BindingRole::QueryParameter => {
                    grouped.query_values.insert(binding.name, binding.value);
                }
                BindingRole::Body => {
                    if grouped.body.is_none() {
                        grouped.body = Some(binding.value);
                    }
                }
            }
        }
        grouped
    }
}
