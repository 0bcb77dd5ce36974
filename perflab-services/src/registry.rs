//! Explicit service wiring.
//!
//! Services are registered with the names of the services they depend on.
//! `ServiceRegistry::build` validates the whole graph before anything is
//! constructed:
//! - every name is registered once
//! - every dependency is registered
//! - the graph has no cycles
//!
//! The resulting `ServiceProvider` builds a fresh `ServiceScope` per request,
//! constructing services dependencies-first.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use perflab_core::WorkService;

pub type ServiceFactory =
    Arc<dyn Fn(&ServiceScope) -> Result<Arc<dyn WorkService>, WiringError> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("circular service dependency: {}", .path.join(" -> "))]
    Cycle { path: Vec<&'static str> },

    #[error("service {service} depends on {dependency}, which is not registered")]
    UnresolvedDependency {
        service: &'static str,
        dependency: &'static str,
    },

    #[error("service {0} is registered more than once")]
    DuplicateService(&'static str),

    #[error("service {0} is not registered")]
    NotRegistered(String),
}

struct Registration {
    name: &'static str,
    dependencies: Vec<&'static str>,
    factory: ServiceFactory,
}

#[derive(Default)]
pub struct ServiceRegistry {
    registrations: Vec<Registration>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        name: &'static str,
        dependencies: &[&'static str],
        factory: F,
    ) -> &mut Self
    where
        F: Fn(&ServiceScope) -> Result<Arc<dyn WorkService>, WiringError> + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            name,
            dependencies: dependencies.to_vec(),
            factory: Arc::new(factory),
        });
        self
    }

    /// Validate the dependency graph and fix the construction order.
    pub fn build(self) -> Result<ServiceProvider, WiringError> {
        let mut index: HashMap<&'static str, usize> = HashMap::new();
        for (position, registration) in self.registrations.iter().enumerate() {
            if index.insert(registration.name, position).is_some() {
                return Err(WiringError::DuplicateService(registration.name));
            }
        }

        for registration in &self.registrations {
            for dependency in &registration.dependencies {
                if !index.contains_key(dependency) {
                    return Err(WiringError::UnresolvedDependency {
                        service: registration.name,
                        dependency: *dependency,
                    });
                }
            }
        }

        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        let mut order = Vec::with_capacity(self.registrations.len());
        for registration in &self.registrations {
            visit(
                registration.name,
                &self.registrations,
                &index,
                &mut visited,
                &mut stack,
                &mut order,
            )?;
        }

        let mut slots: Vec<Option<Registration>> =
            self.registrations.into_iter().map(Some).collect();
        let registrations = order
            .iter()
            .filter_map(|name| slots[index[name]].take())
            .collect();

        Ok(ServiceProvider { registrations })
    }
}

/// Depth-first walk that emits services after their dependencies.
/// `stack` holds the current path; meeting a name already on it is a cycle.
fn visit(
    name: &'static str,
    registrations: &[Registration],
    index: &HashMap<&'static str, usize>,
    visited: &mut HashSet<&'static str>,
    stack: &mut Vec<&'static str>,
    order: &mut Vec<&'static str>,
) -> Result<(), WiringError> {
    if let Some(start) = stack.iter().position(|entry| *entry == name) {
        let mut path = stack[start..].to_vec();
        path.push(name);
        return Err(WiringError::Cycle { path });
    }
    if visited.contains(name) {
        return Ok(());
    }

    stack.push(name);
    for dependency in &registrations[index[name]].dependencies {
        visit(*dependency, registrations, index, visited, stack, order)?;
    }
    stack.pop();

    visited.insert(name);
    order.push(name);
    Ok(())
}

/// A validated set of registrations, sorted dependencies-first
pub struct ServiceProvider {
    registrations: Vec<Registration>,
}

impl ServiceProvider {
    pub fn construction_order(&self) -> Vec<&'static str> {
        self.registrations.iter().map(|r| r.name).collect()
    }

    /// Construct a fresh instance of every service for one request
    pub fn create_scope(&self) -> Result<ServiceScope, WiringError> {
        let mut scope = ServiceScope {
            services: HashMap::with_capacity(self.registrations.len()),
        };
        for registration in &self.registrations {
            let service = (registration.factory)(&scope)?;
            scope.services.insert(registration.name, service);
        }
        Ok(scope)
    }
}

/// Service instances owned by a single request
pub struct ServiceScope {
    services: HashMap<&'static str, Arc<dyn WorkService>>,
}

impl ServiceScope {
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn WorkService>, WiringError> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| WiringError::NotRegistered(name.to_string()))
    }
}
