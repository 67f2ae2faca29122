//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{AuthPipeline, CredentialStore, HashParams, DEFAULT_TOKEN_LENGTH};
use crate::counter::{Counter, MemoryCounter};

/// Application state shared across handlers.
pub struct AppState {
    /// Both access gates, plus the credential store they read.
    pub pipeline: Arc<AuthPipeline>,
    /// Counter backing `/counter`.
    pub counter: Arc<dyn Counter>,
    /// Cost parameters for newly issued password hashes.
    pub hash_params: HashParams,
    /// Session token length in random bytes.
    pub token_length: usize,
}

impl AppState {
    /// Create a new application state with an in-memory counter.
    pub fn new(pipeline: Arc<AuthPipeline>) -> Self {
        Self {
            pipeline,
            counter: Arc::new(MemoryCounter::new()),
            hash_params: HashParams::default(),
            token_length: DEFAULT_TOKEN_LENGTH,
        }
    }

    pub fn with_counter(mut self, counter: Arc<dyn Counter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_hash_params(mut self, params: HashParams) -> Self {
        self.hash_params = params;
        self
    }

    pub fn with_token_length(mut self, length: usize) -> Self {
        self.token_length = length;
        self
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        self.pipeline.store()
    }
}
