pub mod work;
pub mod registry;
pub mod wiring;

pub use work::{AService, BService};
pub use registry::{ServiceProvider, ServiceRegistry, ServiceScope, WiringError};
pub use wiring::{build_demo_provider, demo_registry, SERVICE_A, SERVICE_B};
