//! Browser bindings — the client half of the protocol runs the simulation
//! and ships only the lock hex to the server

use wasm_bindgen::prelude::*;

/// Derive a lock for `(username, password)` and return it as hex
#[wasm_bindgen(js_name = deriveLock)]
pub fn derive_lock_hex(
    username: &str,
    password: &str,
    width: usize,
    height: usize,
    generations: u32,
) -> Result<String, JsValue> {
    crate::derive_lock(&[username, password], width, height, u64::from(generations))
        .map(|lock| lock.to_hex())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check `(username, password)` against a hex lock
#[wasm_bindgen(js_name = verifyLock)]
pub fn verify_lock_hex(
    username: &str,
    password: &str,
    width: usize,
    height: usize,
    generations: u32,
    lock_hex: &str,
) -> bool {
    let expected = hex::decode(lock_hex.trim()).unwrap_or_default();
    crate::verify_lock(&[username, password], width, height, u64::from(generations), &expected)
}
