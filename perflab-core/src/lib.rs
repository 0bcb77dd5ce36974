pub mod models;
pub mod repository;
pub mod bulk;
pub mod services;

pub use models::{NewOrder, Order};
pub use repository::{OrderRepository, StoreError};
pub use bulk::{BulkInsertReport, InsertMode};
pub use services::{WiringMode, WorkService};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Out of memory: {0}")]
    OutOfMemory(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
