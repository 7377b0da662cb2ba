//! The standard CRUD contract and a typed client for it.
//!
//! A CRUD api mounted at `/api/widgets` answers:
//!
//! | method      | verb   | path                | success                     |
//! |-------------|--------|---------------------|-----------------------------|
//! | `get_all`   | GET    | `/api/widgets`      | 200, list of dtos           |
//! | `get_by_id` | GET    | `/api/widgets/{id}` | 200, one dto                |
//! | `create`    | POST   | `/api/widgets`      | 201, `Location`, empty body |
//! | `update`    | PUT    | `/api/widgets`      | 200, the id                 |
//! | `delete`    | DELETE | `/api/widgets/{id}` | 204 (400 if nothing went)   |

use std::any::type_name;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiDefinition, MethodDefinition};
use crate::client::{RestApiProxy, RestClient};
use crate::error::InvokeError;
use crate::params::ParamSpec;
use crate::response::RestResponse;
use crate::return_type::TypeShape;
use crate::route::Mapping;

pub const GET_ALL: &str = "get_all";
pub const GET_BY_ID: &str = "get_by_id";
pub const CREATE: &str = "create";
pub const UPDATE: &str = "update";
pub const DELETE: &str = "delete";

/// The CRUD contract for dto `D` keyed by `Id`, with no interface path.
///
/// Concrete apis extend it and add their own interface-level mapping.
pub fn crud_rest_api<D: 'static, Id: 'static>() -> ApiDefinition {
    ApiDefinition::builder("CrudRestApi", "")
        .mapping(Mapping::request(""))
        .method(
            MethodDefinition::new(GET_ALL)
                .mapping(Mapping::get(""))
                .returns(TypeShape::wrapper("RestResponse", TypeShape::list_of(TypeShape::of::<D>()))),
        )
        .method(
            MethodDefinition::new(GET_BY_ID)
                .mapping(Mapping::get("/{id}"))
                .param(ParamSpec::path("id"))
                .returns(TypeShape::wrapper("RestResponse", TypeShape::of::<D>())),
        )
        .method(
            MethodDefinition::new(CREATE)
                .mapping(Mapping::Post(Vec::new()))
                .param(ParamSpec::body("dto"))
                .returns(TypeShape::of::<Value>()),
        )
        .method(
            MethodDefinition::new(UPDATE)
                .mapping(Mapping::Put(Vec::new()))
                .param(ParamSpec::body("dto"))
                .returns(TypeShape::wrapper("RestResponse", TypeShape::of::<Id>())),
        )
        .method(
            MethodDefinition::new(DELETE)
                .mapping(Mapping::delete("/{id}"))
                .param(ParamSpec::path("id"))
                .returns(TypeShape::of::<Value>()),
        )
        .build()
}

/// Typed adapter over a CRUD api.
#[derive(Debug, Clone)]
pub struct CrudClient<D, Id> {
    proxy: RestApiProxy,
    _types: PhantomData<fn() -> (D, Id)>,
}

impl<D, Id> CrudClient<D, Id>
where
    D: Serialize + DeserializeOwned + 'static,
    Id: Serialize + DeserializeOwned + 'static,
{
    /// CRUD client for `application`, mounted at `base_path`.
    pub fn new(application: &str, base_path: &str, client: RestClient) -> Result<Self, InvokeError> {
        let api = ApiDefinition::builder(type_name::<D>(), application)
            .mapping(Mapping::request(base_path))
            .extends(&crud_rest_api::<D, Id>())
            .build();
        Self::from_api(api, client)
    }

    /// Wrap an api that extends [`crud_rest_api`], possibly with extra methods
    /// reachable through [`CrudClient::proxy`].
    pub fn from_api(api: ApiDefinition, client: RestClient) -> Result<Self, InvokeError> {
        Ok(Self {
            proxy: RestApiProxy::new(api, client)?,
            _types: PhantomData,
        })
    }

    pub fn proxy(&self) -> &RestApiProxy {
        &self.proxy
    }

    pub fn get_all(&self) -> Result<RestResponse<D>, InvokeError> {
        self.proxy.call(GET_ALL, &[])
    }

    pub fn get_by_id(&self, id: &Id) -> Result<RestResponse<D>, InvokeError> {
        self.proxy.call(GET_BY_ID, &[serde_json::to_value(id)?])
    }

    /// On success the new resource's location is in the `Location` header.
    pub fn create(&self, dto: &D) -> Result<RestResponse<Value>, InvokeError> {
        self.proxy.call(CREATE, &[serde_json::to_value(dto)?])
    }

    pub fn update(&self, dto: &D) -> Result<RestResponse<Id>, InvokeError> {
        self.proxy.call(UPDATE, &[serde_json::to_value(dto)?])
    }

    pub fn delete(&self, id: &Id) -> Result<RestResponse<Value>, InvokeError> {
        self.proxy.call(DELETE, &[serde_json::to_value(id)?])
    }
}
