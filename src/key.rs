//! Binding key types for the registry.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

/// Key for binding storage and lookup.
///
/// A key is either the identity of a type or an application-chosen name.
/// Type keys additionally drive the capability fallback: when no binding is
/// stored under a type key, the registry looks for a binding whose produced
/// type (or one of its declared capabilities) is that type.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Key, Registry, Resolver};
///
/// let registry = Registry::new();
/// registry.bind_value(Key::of::<u32>(), 42u32).unwrap();
/// registry.bind_value("http.port", 8080u32).unwrap();
///
/// assert_eq!(*registry.get::<u32>().unwrap(), 42);
/// assert_eq!(*registry.get_by_key::<u32>("http.port").unwrap(), 8080);
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Type identity with its name for diagnostics
    ///
    /// Equality and hashing consider only the `TypeId`.
    Type(TypeId, &'static str),
    /// Application-chosen token
    Named(Cow<'static, str>),
}

impl Key {
    /// Type key for `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Named key.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Key::Named(name.into())
    }

    /// The `TypeId` this key requests, if it is a type key.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Key::Type(id, _) => Some(*id),
            Key::Named(_) => None,
        }
    }

    /// Type name or token for display
    ///
    /// ```rust
    /// use ferrous_registry::Key;
    ///
    /// assert_eq!(Key::of::<u32>().display_name(), "u32");
    /// assert_eq!(Key::named("db.primary").display_name(), "db.primary");
    /// ```
    pub fn display_name(&self) -> &str {
        match self {
            Key::Type(_, name) => name,
            Key::Named(name) => name,
        }
    }
}

impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Named(a), Key::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Named(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(_, name) => write!(f, "type={}", name),
            Key::Named(name) => write!(f, "key={}", name),
        }
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::Named(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Named(Cow::Owned(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Type key for `T`; same as [`Key::of`].
#[inline]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn type_keys_ignore_name() {
        let a = Key::Type(TypeId::of::<u8>(), "u8");
        let b = Key::Type(TypeId::of::<u8>(), "alias");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn borrowed_and_owned_names_match() {
        assert_eq!(Key::from("db"), Key::from("db".to_string()));
        assert_ne!(Key::from("db"), Key::of::<String>());
    }

    #[test]
    fn display_marks_kind() {
        assert_eq!(Key::of::<u8>().to_string(), "type=u8");
        assert_eq!(Key::named("db").to_string(), "key=db");
        assert_eq!(Key::named("db").type_id(), None);
    }

    #[test]
    fn unsized_types_have_keys() {
        trait Marker {}
        assert_eq!(Key::of::<dyn Marker>(), key_of_type::<dyn Marker>());
        assert_ne!(Key::of::<dyn Marker>(), Key::of::<str>());
    }
}
