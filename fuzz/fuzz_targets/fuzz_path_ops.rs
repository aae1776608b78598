#![no_main]

use guardon::path::{delete, get, has, set};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split between path and JSON document.
    let split = data[0] as usize % data.len().max(1);
    let (path_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let path = String::from_utf8_lossy(path_bytes);

    if let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(value_bytes) {
        let _ = get(&value, &path);
        if set(&mut value, &path, serde_json::Value::Bool(true)).is_ok() {
            assert_eq!(get(&value, &path), Some(&serde_json::Value::Bool(true)));
        }
        delete(&mut value, &path);
        let _ = has(&value, &path);
    }
});
