use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A unit of simulated asynchronous work
#[async_trait]
pub trait WorkService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn do_work(&self);
}

/// How the demo services are wired together at startup.
///
/// `Circular` adds a back-edge from service B to service A and exists only to
/// reproduce the startup failure a dependency cycle causes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WiringMode {
    #[default]
    Acyclic,
    Circular,
}
