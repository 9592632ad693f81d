//! Browser `localStorage` backend for the booking slots.
use removals_booking::KeyValueStore;

use crate::dom;

/// Web-specific booking storage using localStorage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

fn storage() -> Result<web_sys::Storage, WebStorageError> {
    dom::local_storage().map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))
}

impl KeyValueStore for LocalStorage {
    type Error = WebStorageError;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        storage()?
            .get_item(key)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        storage()?
            .set_item(key, value)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        storage()?
            .remove_item(key)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }
}
