//! Error types for the registry.

use std::error::Error as StdError;
use std::sync::Arc;

/// Shared handle to an error returned by a fallible factory.
pub type FactoryError = Arc<dyn StdError + Send + Sync + 'static>;

/// Registry errors
///
/// Every registration, lookup and invocation reports failure through this
/// enum. Nothing is retried and nothing is logged; the caller decides.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{DiError, Registry, Resolver};
///
/// let registry = Registry::new();
/// match registry.get::<String>() {
///     Err(DiError::ObjectNotFound(key)) => assert!(key.contains("String")),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// A registration call received an absent or ill-formed factory or value.
    #[error("invalid args: {0}")]
    InvalidArgs(String),
    /// A registration call used a key that is already bound.
    #[error("can not bind a value with repeated key: {0}")]
    RepeatedBind(String),
    /// No record matched the key, neither exactly nor by capability.
    #[error("the object can not be found in registry: {0}")]
    ObjectNotFound(String),
    /// The invoker could not supply one parameter of a callback.
    #[error("the arg #{position} ({type_name}) can not be found in registry: {source}")]
    ArgNotInstanced {
        /// Zero-based parameter position
        position: usize,
        /// Declared parameter type
        type_name: &'static str,
        /// Underlying lookup or factory failure
        #[source]
        source: Box<DiError>,
    },
    /// A factory produced no value at all.
    #[error("invalid return value count: {0}")]
    InvalidReturnValueCount(String),
    /// Error returned by a factory, passed through unchanged.
    #[error("{0}")]
    Factory(#[source] FactoryError),
    /// A value was found but is not of the requested type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The matched binding produced an absent value.
    #[error("the object in registry is absent: {0}")]
    AbsentValue(String),
}

impl DiError {
    /// Wraps an error returned by a factory.
    pub fn factory<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        DiError::Factory(Arc::from(error.into()))
    }

    /// Returns the factory error if it has type `E`.
    ///
    /// Looks through `ArgNotInstanced` wrappers, so a factory failure that
    /// happened while resolving a callback parameter is still reachable.
    pub fn factory_error<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            DiError::Factory(inner) => inner.downcast_ref::<E>(),
            DiError::ArgNotInstanced { source, .. } => source.factory_error(),
            _ => None,
        }
    }

    /// True for errors meaning "nothing to supply" rather than "supplying failed".
    pub(crate) fn is_missing(&self) -> bool {
        matches!(self, DiError::ObjectNotFound(_) | DiError::AbsentValue(_))
    }
}

/// Result type for registry operations
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{DiError, DiResult};
///
/// fn lookup() -> DiResult<u32> {
///     Err(DiError::ObjectNotFound("port".to_string()))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;

/// Unwraps a registry result, panicking with the error message otherwise.
///
/// Intended for startup wiring where a missing binding is unrecoverable.
///
/// ```rust
/// use ferrous_registry::{must, Registry};
///
/// let registry = Registry::new();
/// must(registry.bind_value("port", 8080u16));
/// ```
#[track_caller]
pub fn must<T>(result: DiResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn factory_error_keeps_message_and_source() {
        let err = DiError::factory(DiskFull);
        assert_eq!(err.to_string(), "disk full");
        assert!(err.factory_error::<DiskFull>().is_some());
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".to_string()));
    }

    #[test]
    fn factory_error_found_through_arg_wrapper() {
        let err = DiError::ArgNotInstanced {
            position: 1,
            type_name: "alloc::sync::Arc<u8>",
            source: Box::new(DiError::factory(DiskFull)),
        };
        assert!(err.factory_error::<DiskFull>().is_some());
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_classification() {
        assert!(DiError::ObjectNotFound("k".into()).is_missing());
        assert!(DiError::AbsentValue("k".into()).is_missing());
        assert!(!DiError::InvalidArgs("k".into()).is_missing());
    }

    #[test]
    #[should_panic(expected = "invalid args: nope")]
    fn must_panics_with_message() {
        must::<()>(Err(DiError::InvalidArgs("nope".into())));
    }
}
