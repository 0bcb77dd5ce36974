use async_trait::async_trait;
use crate::models::NewOrder;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage failure during {operation}: {source}")]
    Failure {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub fn failure<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::Failure {
            operation,
            source: source.into(),
        }
    }
}

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist one order in its own commit and return the assigned id.
    async fn insert_one(&self, order: &NewOrder) -> Result<i64, StoreError>;

    /// Persist every order and commit exactly once. Returns the number of rows written.
    async fn insert_batch(&self, orders: &[NewOrder]) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
