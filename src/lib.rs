//! # ferrous-registry
//!
//! Type-directed dependency registry with injected function calls.
//!
//! ## Features
//!
//! - **Keyed bindings**: bind factories or precomputed values under a type or a name
//! - **Lazy lifetimes**: singletons are produced once on first access, prototypes on every access
//! - **Capability matching**: a binding can serve requests for trait objects it declares
//! - **Injected calls**: any function whose parameters the registry can supply can be called through it
//! - **Thread-safe**: `Registry` is a cheap `Send + Sync` handle; singletons are produced exactly once
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_registry::{Registry, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let registry = Registry::new();
//! registry.singleton(|| Database {
//!     connection_string: "postgres://localhost".to_string(),
//! }).unwrap();
//! registry.prototype(|db: Arc<Database>| UserService { db }).unwrap();
//!
//! let users = registry.get::<UserService>().unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: produced on first access and shared afterwards
//! - **Prototype**: produced fresh on every access
//!
//! Precomputed values are always singletons.
//!
//! ## Capability Matching
//!
//! ```rust
//! use ferrous_registry::{Binding, Registry, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("LOG: {}", message)
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry
//!     .register(Binding::factory(|| ConsoleLogger).provides(|l| l as Arc<dyn Logger>))
//!     .unwrap();
//!
//! let logger = registry.get::<dyn Logger>().unwrap();
//! assert_eq!(logger.log("Hello"), "LOG: Hello");
//! ```
//!
//! A request for a type key that has no exact binding is served by the
//! earliest registered binding that produces the type or declares it with
//! [`Binding::provides`]. Named keys only ever match exactly.
//!
//! ## Injected Calls
//!
//! ```rust
//! use ferrous_registry::{Registry, Resolver};
//! use std::sync::Arc;
//!
//! struct Request { path: String }
//!
//! let registry = Registry::new();
//! registry.bind_value(ferrous_registry::Key::of::<Request>(), Request {
//!     path: "/users".to_string(),
//! }).unwrap();
//!
//! let results = registry.call(|req: Arc<Request>, r: Registry| {
//!     assert_eq!(r.len(), 1);
//!     req.path.len()
//! }).unwrap();
//! assert_eq!(*results[0].downcast::<usize>().unwrap(), 6);
//! ```
//!
//! ## Cargo Features
//!
//! - `diagnostics`: `Registry::to_debug_string` dump of every binding
//! - `config`: `Registry::bind_json` and `Registry::bind_json_env` for serde settings structs

// Module declarations
pub mod binding;
pub mod descriptors;
pub mod error;
pub mod invoke;
pub mod key;
pub mod lifetime;
pub mod registry;
pub mod stats;
pub mod traits;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

// Re-export core types
pub use binding::{Binding, FactoryResult, RawFactory};
pub use descriptors::BindingDescriptor;
pub use error::{must, DiError, DiResult, FactoryError};
pub use invoke::{FromRegistry, Injectable};
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use registry::Registry;
pub use stats::RegistryStats;
pub use traits::{Resolver, ResolverCore};
pub use value::{TypeInfo, Value};
