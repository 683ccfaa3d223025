//! Application state shared across handlers

use std::sync::Arc;

use crate::{models::Catalog, repositories::UserStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, catalog: Catalog) -> Self {
        Self { users, catalog }
    }
}
