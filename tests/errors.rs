use ferrous_registry::{must, DiError, DiResult, Key, Lifetime, RawFactory, Registry, Resolver, ResolverCore, TypeInfo, Value};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("connection refused on port {0}")]
struct ConnectionRefused(u16);

#[test]
fn test_error_messages() {
    let cases = vec![
        (DiError::InvalidArgs("factory is absent".into()), "invalid args: factory is absent"),
        (
            DiError::RepeatedBind("type=u32".into()),
            "can not bind a value with repeated key: type=u32",
        ),
        (
            DiError::ObjectNotFound("key=db".into()),
            "the object can not be found in registry: key=db",
        ),
        (
            DiError::AbsentValue("key=db".into()),
            "the object in registry is absent: key=db",
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn test_factory_error_is_passed_through() {
    let registry = Registry::new();
    registry
        .bind_fallible(|| Err::<String, _>(ConnectionRefused(5432)), Lifetime::Singleton)
        .unwrap();

    let err = registry.get::<String>().unwrap_err();
    assert_eq!(err.to_string(), "connection refused on port 5432");
    assert_eq!(err.factory_error::<ConnectionRefused>().map(|e| e.0), Some(5432));
    assert_eq!(
        err.source().map(|s| s.to_string()),
        Some("connection refused on port 5432".to_string())
    );
}

#[test]
fn test_failures_are_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();

    let registry = Registry::new();
    registry
        .bind_fallible(
            move || {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ConnectionRefused(6379))
                } else {
                    Ok(String::from("connected"))
                }
            },
            Lifetime::Singleton,
        )
        .unwrap();

    assert!(registry.get::<String>().is_err());
    assert!(registry.get::<String>().is_err());
    assert_eq!(*registry.get::<String>().unwrap(), "connected");
    assert_eq!(*registry.get::<String>().unwrap(), "connected");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_unit_producing_raw_factory() {
    let registry = Registry::new();
    let factory: RawFactory = Arc::new(|_: &Registry| -> DiResult<Option<Value>> { Ok(Some(Value::from_owned(()))) });
    registry
        .bind_raw("side-effect", TypeInfo::of::<u8>(), Some(factory), Lifetime::Prototype)
        .unwrap();

    let err = registry.resolve_key(&Key::named("side-effect")).unwrap_err();
    assert!(matches!(err, DiError::InvalidReturnValueCount(_)));
}

#[test]
fn test_nested_argument_error_chain() {
    struct Inner;
    #[derive(Debug)]
    struct Outer;

    let registry = Registry::new();
    registry.singleton(|_inner: Arc<Inner>| Outer).unwrap();

    let err = registry.get::<Outer>().unwrap_err();
    let DiError::ArgNotInstanced { position, source, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*position, 0);
    assert!(matches!(**source, DiError::ObjectNotFound(ref k) if k.contains("Inner")));

    // The chain is walkable through std::error::Error.
    let depth = std::iter::successors(Some(&err as &dyn Error), |e: &&dyn Error| (*e).source()).count();
    assert_eq!(depth, 2);
}

#[test]
fn test_errors_are_cloneable() {
    let err = DiError::factory(ConnectionRefused(80));
    let copy = err.clone();
    assert_eq!(err.to_string(), copy.to_string());
    assert!(copy.factory_error::<ConnectionRefused>().is_some());
}

#[test]
#[should_panic(expected = "can not bind a value with repeated key")]
fn test_must_panics_on_repeated_bind() {
    let registry = Registry::new();
    must(registry.bind_value("port", 80u16));
    must(registry.bind_value("port", 81u16));
}

#[test]
#[should_panic(expected = "the object can not be found in registry: key=absent")]
fn test_must_get_by_key_panics() {
    let registry = Registry::new();
    let _ = registry.must_get_by_key::<u8>("absent");
}
