//! Lookup traits implemented by the registry.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
