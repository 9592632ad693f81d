//! Booking record persistence over a string key-value store.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::record::BookingRecord;

/// Slot holding the booking in progress.
pub const IN_PROGRESS_KEY: &str = "bookingData";
/// Slot holding the last confirmed booking.
pub const COMPLETED_KEY: &str = "completedBooking";

/// Trait for abstracting string storage (browser `localStorage`, memory, ...).
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Erase a slot. Erasing a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), Self::Error>;
}

/// Shared in-memory store; clones see the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError<E>
where
    E: std::error::Error + 'static,
{
    #[error("storage backend error: {0}")]
    Backend(#[source] E),
    #[error("could not encode booking: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The in-progress and completed booking slots.
#[derive(Debug, Clone)]
pub struct BookingStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> BookingStore<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &S {
        &self.backend
    }

    fn read(&self, key: &str) -> Option<BookingRecord> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::error!("failed to read {key}: {err}");
                return None;
            }
        };
        match BookingRecord::from_json(&raw) {
            Ok(record) if record.is_supported_version() => Some(record),
            Ok(record) => {
                log::warn!("{key} has unsupported version {}; ignoring", record.version);
                None
            }
            Err(err) => {
                log::warn!("discarding unreadable {key}: {err}");
                if let Err(err) = self.backend.remove_item(key) {
                    log::error!("failed to remove invalid {key}: {err}");
                }
                None
            }
        }
    }

    fn write(&self, key: &str, record: &BookingRecord) -> Result<(), StoreError<S::Error>> {
        let json = record.to_json()?;
        self.backend
            .set_item(key, &json)
            .map_err(StoreError::Backend)
    }

    /// The booking in progress. Missing, unreadable or future-version data
    /// all load as `None`.
    #[must_use]
    pub fn load(&self) -> Option<BookingRecord> {
        self.read(IN_PROGRESS_KEY)
    }

    /// Overwrite the booking in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn save(&self, record: &BookingRecord) -> Result<(), StoreError<S::Error>> {
        self.write(IN_PROGRESS_KEY, record)
    }

    /// Erase the booking in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    pub fn clear(&self) -> Result<(), StoreError<S::Error>> {
        self.backend
            .remove_item(IN_PROGRESS_KEY)
            .map_err(StoreError::Backend)
    }

    /// The last confirmed booking.
    #[must_use]
    pub fn load_completed(&self) -> Option<BookingRecord> {
        self.read(COMPLETED_KEY)
    }

    /// Move a confirmed booking into the completed slot and erase the
    /// in-progress slot.
    ///
    /// # Errors
    ///
    /// Returns an error if either slot cannot be written.
    pub fn complete(&self, record: &BookingRecord) -> Result<(), StoreError<S::Error>> {
        self.write(COMPLETED_KEY, record)?;
        self.clear()
    }
}
