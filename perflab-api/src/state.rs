use anyhow::Context;
use perflab_core::OrderRepository;
use perflab_services::{build_demo_provider, ServiceProvider};
use perflab_store::app_config::{BulkConfig, Config};
use perflab_store::{DbClient, PgOrderRepository};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub services: Arc<ServiceProvider>,
    pub bulk: BulkConfig,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        services: ServiceProvider,
        bulk: BulkConfig,
    ) -> Self {
        Self {
            orders,
            services: Arc::new(services),
            bulk,
        }
    }

    /// Validate service wiring, connect to PostgreSQL and make sure the schema exists.
    pub async fn bootstrap(config: &Config) -> anyhow::Result<Self> {
        // Wiring goes first so a cyclic graph stops startup before the database is touched
        let services = build_demo_provider(
            config.services.wiring,
            Duration::from_millis(config.services.work_delay_ms),
        )
        .context("Service wiring failed")?;

        let db = DbClient::new(&config.database)
            .await
            .context("Failed to connect to database")?;
        db.migrate().await.context("Failed to create orders schema")?;

        let orders = Arc::new(PgOrderRepository::new(db.pool.clone()));
        Ok(Self::new(orders, services, config.bulk.clone()))
    }
}
