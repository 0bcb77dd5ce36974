use async_trait::async_trait;
use perflab_core::WorkService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Sleeps, then hands off to its downstream service
pub struct AService {
    downstream: Arc<dyn WorkService>,
    delay: Duration,
}

impl AService {
    pub fn new(downstream: Arc<dyn WorkService>, delay: Duration) -> Self {
        Self { downstream, delay }
    }
}

#[async_trait]
impl WorkService for AService {
    fn name(&self) -> &'static str {
        "service-a"
    }

    async fn do_work(&self) {
        sleep(self.delay).await;
        debug!("{} finished its delay, calling {}", self.name(), self.downstream.name());
        self.downstream.do_work().await;
    }
}

/// Leaf of the chain.
///
/// A callback into an upstream service can be attached to build the circular
/// wiring; the registry refuses to construct that graph.
pub struct BService {
    delay: Duration,
    callback: Option<Arc<dyn WorkService>>,
}

impl BService {
    pub fn new(delay: Duration) -> Self {
        Self { delay, callback: None }
    }

    pub fn with_callback(delay: Duration, callback: Arc<dyn WorkService>) -> Self {
        Self {
            delay,
            callback: Some(callback),
        }
    }
}

#[async_trait]
impl WorkService for BService {
    fn name(&self) -> &'static str {
        "service-b"
    }

    async fn do_work(&self) {
        sleep(self.delay).await;
        debug!("{} finished its delay", self.name());
        if let Some(callback) = &self.callback {
            callback.do_work().await;
        }
    }
}
