use perflab_core::{WiringMode, WorkService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::registry::{ServiceProvider, ServiceRegistry, WiringError};
use crate::work::{AService, BService};

pub const SERVICE_A: &str = "service-a";
pub const SERVICE_B: &str = "service-b";

/// Registrations for the A → B demo chain.
///
/// `WiringMode::Circular` makes B depend on A as well.
pub fn demo_registry(mode: WiringMode, delay: Duration) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();

    registry.register(SERVICE_A, &[SERVICE_B], move |scope| {
        let service: Arc<dyn WorkService> =
            Arc::new(AService::new(scope.resolve(SERVICE_B)?, delay));
        Ok(service)
    });

    match mode {
        WiringMode::Acyclic => {
            registry.register(SERVICE_B, &[], move |_| {
                let service: Arc<dyn WorkService> = Arc::new(BService::new(delay));
                Ok(service)
            });
        }
        WiringMode::Circular => {
            registry.register(SERVICE_B, &[SERVICE_A], move |scope| {
                let service: Arc<dyn WorkService> =
                    Arc::new(BService::with_callback(delay, scope.resolve(SERVICE_A)?));
                Ok(service)
            });
        }
    }

    registry
}

/// Validate the demo wiring. Called once at startup, before anything else is initialised.
pub fn build_demo_provider(
    mode: WiringMode,
    delay: Duration,
) -> Result<ServiceProvider, WiringError> {
    let provider = demo_registry(mode, delay).build()?;
    info!(
        "Service wiring validated, construction order: {}",
        provider.construction_order().join(", ")
    );
    Ok(provider)
}
