//! Best-score persistence
//!
//! The best score is a decimal string under a single key. Anything missing or
//! unreadable counts as 0; failed writes come back as [`StorageError`] for the
//! caller to log.

use thiserror::Error;

use crate::platform::KeyValueStore;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Why a write to the key-value store failed
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read the persisted best score (0 on missing or corrupt data)
pub fn get_best(store: &dyn KeyValueStore) -> u64 {
    let Some(raw) = store.get(BEST_SCORE_KEY) else {
        return 0;
    };
    match raw.trim().parse::<u64>() {
        Ok(best) => best,
        Err(_) => {
            log::warn!("Ignoring corrupt best score {:?}", raw);
            0
        }
    }
}

/// Persist the best score
pub fn set_best(store: &mut dyn KeyValueStore, best: u64) -> Result<(), StorageError> {
    store.set(BEST_SCORE_KEY, &best.to_string())
}
