//! Shared application state.

use std::sync::Arc;

use crate::{services::object_store::ObjectStore, view::IndexTemplate};

/// State threaded through every request handler. Built once at startup;
/// no globals, so tests construct one per scenario.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the remote bucket.
    pub store: Arc<dyn ObjectStore>,

    /// Shared secret required on uploads.
    pub auth_key: String,

    /// Listing template, parsed once.
    pub template: Arc<IndexTemplate>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        auth_key: impl Into<String>,
        template: IndexTemplate,
    ) -> Self {
        Self {
            store,
            auth_key: auth_key.into(),
            template: Arc::new(template),
        }
    }
}
