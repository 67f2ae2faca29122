//! Shared counter service.
//!
//! The `/counter` endpoint only needs "increment and return". Backends sit
//! behind [`Counter`] so a networked store can replace [`MemoryCounter`].

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;

/// Counter backend errors.
#[derive(Error, Debug)]
pub enum CounterError {
    /// The counter would overflow.
    #[error("counter `{0}` overflowed")]
    Overflow(String),

    /// The backend could not be reached.
    #[error("counter backend unavailable: {0}")]
    Unavailable(String),
}

/// An increment-only named counter.
pub trait Counter: Send + Sync {
    /// Increment `key` by one and return the new value.
    fn incr(&self, key: &str) -> Result<i64, CounterError>;
}

/// Process-local counter.
#[derive(Debug, Default)]
pub struct MemoryCounter {
    values: Mutex<HashMap<String, i64>>,
}

impl MemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Counter for MemoryCounter {
    fn incr(&self, key: &str) -> Result<i64, CounterError> {
        let mut values = self.values.lock();
        let value = values.entry(key.to_string()).or_insert(0);
        *value = value
            .checked_add(1)
            .ok_or_else(|| CounterError::Overflow(key.to_string()))?;
        Ok(*value)
    }
}
