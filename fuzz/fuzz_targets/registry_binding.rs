#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_registry::{DiError, Key, Registry, Resolver};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct TestService {
    value: u8,
}

fuzz_target!(|data: &[u8]| {
    let registry = Registry::new();
    let mut expected: HashMap<u8, u8> = HashMap::new();

    // Each pair of bytes is one operation: (opcode + key, value)
    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 5;
        let key_id = chunk[0] / 5 % 16;
        let value = chunk[1];
        let key = Key::named(format!("svc.{}", key_id));

        match op {
            0 => {
                let result = registry.bind_value(key, TestService { value });
                check_bind(result, &mut expected, key_id, value);
            }
            1 => {
                let result = registry.singleton_with_key(key, move || TestService { value });
                check_bind(result, &mut expected, key_id, value);
            }
            2 => {
                let result = registry.prototype_with_key(key, move || TestService { value });
                check_bind(result, &mut expected, key_id, value);
            }
            3 => match (registry.get_by_key::<TestService>(key), expected.get(&key_id)) {
                (Ok(service), Some(&v)) => assert_eq!(service.value, v),
                (Err(DiError::ObjectNotFound(_)), None) => {}
                (other, want) => panic!("lookup mismatch: {:?} vs {:?}", other.map(|s| s.value), want),
            },
            _ => {
                let any = registry.invoke(|s: Option<Arc<TestService>>| s.map(|s| s.value));
                assert_eq!(any.unwrap().is_some(), !expected.is_empty());
            }
        }
    }

    assert_eq!(registry.len(), expected.len());
});

fn check_bind(result: Result<(), DiError>, expected: &mut HashMap<u8, u8>, key_id: u8, value: u8) {
    if expected.contains_key(&key_id) {
        assert!(matches!(result, Err(DiError::RepeatedBind(_))));
    } else {
        assert!(result.is_ok());
        expected.insert(key_id, value);
    }
}
