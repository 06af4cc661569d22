use std::sync::Arc;

use roster_config::PaginationConfig;
use roster_database::UserStore;

use crate::services::UserService;

#[derive(Clone)]
pub struct AppState {
    users: UserService,
    pagination: PaginationConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, pagination: PaginationConfig) -> Self {
        Self {
            users: UserService::new(store),
            pagination,
        }
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }
}
