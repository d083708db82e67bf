use std::sync::Arc;

use crate::config::ServerConfig;
use crate::monitoring::MonitoringService;
use vitalwatch_events::SubscriptionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The subscription registry is constructed once at startup and injected here;
/// there is no hidden global, so tests compose a fresh registry per case.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitalwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live subscriber channel registry (real-time fan-out).
    pub registry: Arc<SubscriptionRegistry>,
    /// Measurement orchestrator (persist, evaluate, emit).
    pub monitoring: Arc<MonitoringService>,
}

impl AppState {
    /// Compose the application state from its root dependencies.
    pub fn new(
        pool: vitalwatch_db::DbPool,
        config: ServerConfig,
        registry: Arc<SubscriptionRegistry>,
    ) -> Self {
        let monitoring = Arc::new(MonitoringService::new(pool.clone(), Arc::clone(&registry)));
        Self {
            pool,
            config: Arc::new(config),
            registry,
            monitoring,
        }
    }
}
