//! `localStorage`-backed [`KeyValueStore`].

use crate::preference::KeyValueStore;

/// Attempts to get the browser's localStorage.
///
/// Returns `None` outside a browser, when storage is disabled (private
/// browsing) or when access raises a SecurityError.
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Reads and writes go straight to `localStorage`. When it is unavailable
/// reads return `None` and writes are skipped, so the page keeps working
/// without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = get_storage()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Could not read '{}' from localStorage", key);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = get_storage() else {
            // Expected in private browsing; not worth a warning.
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::warn!(
                "Could not save '{}' to localStorage. \
                 You may be in private browsing mode or storage quota exceeded.",
                key
            );
        }
    }
}
