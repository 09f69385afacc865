//! Business logic services

pub mod auth;
pub mod catalog;
pub mod storage;

use crate::{
    config::{AdminConfig, AuthConfig, UploadsConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        admin_config: AdminConfig,
        uploads_config: &UploadsConfig,
    ) -> Self {
        let covers = storage::CoverStore::new(&uploads_config.dir);

        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config, admin_config),
            catalog: catalog::CatalogService::new(repository.clone(), covers),
            repository,
        }
    }

    /// Round-trip to the database, used by the health endpoint
    pub async fn db_ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
