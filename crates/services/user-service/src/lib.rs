//! User Service Library
//!
//! REST service managing the lifecycle of user accounts: creation, lookup,
//! paginated listing and search, updates, status changes and soft deletion.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::{Database, RedisUserCache};
use crate::repository::UserStore;
use crate::service::{CachedUserService, UserManager, UserService};

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    let manager = UserManager::new(user_repo);

    let user_service: Arc<dyn UserService> = match &config.cache {
        Some(cache_config) => match RedisUserCache::connect(cache_config).await {
            Ok(cache) => Arc::new(CachedUserService::new(manager, Arc::new(cache))),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, serving without cache");
                Arc::new(manager)
            }
        },
        None => Arc::new(manager),
    };

    let app = create_router(AppState::new(user_service));

    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(service = %config.service.service_name, "Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
