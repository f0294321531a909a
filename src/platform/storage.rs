//! LocalStorage access
//!
//! Browser storage is best effort: a missing window, disabled storage or a
//! quota error all read as "nothing stored" / "not written". Native builds
//! have no storage at all.

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Read a key (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Write a key. Returns false when storage rejected it.
#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) -> bool {
    match local_storage() {
        Some(storage) => match storage.set_item(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("LocalStorage write for {} failed: {:?}", key, e);
                false
            }
        },
        None => false,
    }
}

#[cfg(target_arch = "wasm32")]
pub fn remove_item(key: &str) -> bool {
    local_storage()
        .map(|storage| storage.remove_item(key).is_ok())
        .unwrap_or(false)
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(_key: &str, _value: &str) -> bool {
    false
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove_item(_key: &str) -> bool {
    false
}
