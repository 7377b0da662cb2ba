//! Base-URL lookup keyed by logical application name.
//!
//! Populated programmatically or from a JSON document:
//!
//! ```json
//! { "applications": { "inventory": "http://inventory.internal:8080" } }
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::RegistryError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationRegistry {
    applications: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    applications: HashMap<String, String>,
}

impl ApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `base_url` for `application`, replacing any earlier entry.
    /// Trailing slashes are stripped.
    pub fn register(&mut self, application: &str, base_url: &str) -> &mut Self {
        self.applications.insert(
            application.to_string(),
            base_url.trim_end_matches('/').to_string(),
        );
        self
    }

    pub fn with(mut self, application: &str, base_url: &str) -> Self {
        self.register(application, base_url);
        self
    }

    pub fn from_json(document: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = serde_json::from_str(document)?;
        let mut registry = Self::new();
        for (application, base_url) in &document.applications {
            registry.register(application, base_url);
        }
        Ok(registry)
    }

    pub fn base_url(&self, application: &str) -> Result<&str, RegistryError> {
        self.applications
            .get(application)
            .map(String::as_str)
            .ok_or_else(|| RegistryError::UnknownApplication(application.to_string()))
    }
}
