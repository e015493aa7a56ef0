/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::services::auth::AuthService;

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, ConfigError> {
    let auth = AuthService::new(&config.jwt_secret, config.auth_leeway_seconds)?;

    Ok(Arc::new(auth))
}
