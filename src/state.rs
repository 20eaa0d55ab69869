use std::sync::Arc;

use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::services::cache::TagCache;
use crate::utils::jwt::JwtKeys;
use crate::utils::password::PasswordHasher;

/// Services partagés, injectés dans les handlers via `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cache: Arc<TagCache>,
    pub jwt: Arc<JwtKeys>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db,
            cache: Arc::new(TagCache::new(config.cache_ttl_seconds)),
            jwt: Arc::new(JwtKeys::new(&config.jwt_secret, config.jwt_ttl_seconds)),
            hasher: PasswordHasher::new(config.password_hash_iterations),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.db.clone()))
            .app_data(web::Data::from(self.cache.clone()))
            .app_data(web::Data::from(self.jwt.clone()))
            .app_data(web::Data::new(self.hasher.clone()))
            // body / query invalides -> 400 JSON
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::InvalidPayload(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::InvalidPayload(err.to_string()).into()
            }));
    }
}
