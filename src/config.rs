//! Configuration binding.
//!
//! Settings structs are deserialized with serde and bound as precomputed
//! values, so factories can take them as ordinary parameters.

use std::env;

use serde::de::DeserializeOwned;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registry::Registry;

impl Registry {
    /// Deserializes `json` into `T` and binds it under `key`.
    ///
    /// ```rust
    /// use ferrous_registry::{Key, Registry, Resolver};
    /// use serde::Deserialize;
    /// use std::sync::Arc;
    ///
    /// #[derive(Deserialize)]
    /// struct HttpSettings { port: u16 }
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .bind_json::<HttpSettings>(Key::of::<HttpSettings>(), r#"{ "port": 8080 }"#)
    ///     .unwrap();
    ///
    /// let port = registry.invoke(|s: Arc<HttpSettings>| s.port).unwrap();
    /// assert_eq!(port, 8080);
    /// ```
    pub fn bind_json<T>(&self, key: impl Into<Key>, json: &str) -> DiResult<()>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let key = key.into();
        let value: T = serde_json::from_str(json)
            .map_err(|e| DiError::InvalidArgs(format!("invalid configuration for {}: {}", key, e)))?;
        self.bind_value(key, value)
    }

    /// Reads the environment variable `var` as JSON and binds it under `key`.
    pub fn bind_json_env<T>(&self, key: impl Into<Key>, var: &str) -> DiResult<()>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let json = env::var(var)
            .map_err(|e| DiError::InvalidArgs(format!("environment variable {}: {}", var, e)))?;
        self.bind_json::<T>(key, &json)
    }
}
