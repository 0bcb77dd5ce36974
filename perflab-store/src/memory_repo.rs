use async_trait::async_trait;
use perflab_core::{NewOrder, Order, OrderRepository, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct OrderTable {
    rows: Vec<Order>,
    next_id: i64,
}

/// In-process order store.
///
/// Counts commits so the two insert modes can be compared without a database,
/// and can simulate a lost connection once a number of commits has gone through.
#[derive(Default)]
pub struct MemoryOrderRepository {
    table: RwLock<OrderTable>,
    commits: AtomicU64,
    commit_limit: Option<u64>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every commit after the first `limit` fails with a store failure
    pub fn with_commit_limit(limit: u64) -> Self {
        Self {
            commit_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Copy of every stored row, in insertion order
    pub async fn snapshot(&self) -> Vec<Order> {
        self.table.read().await.rows.clone()
    }

    fn check_connection(&self, operation: &'static str) -> Result<(), StoreError> {
        match self.commit_limit {
            Some(limit) if self.commits() >= limit => Err(StoreError::failure(
                operation,
                format!("connection lost after {} commits", limit),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert_one(&self, order: &NewOrder) -> Result<i64, StoreError> {
        let mut table = self.table.write().await;
        self.check_connection("insert_one")?;

        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(order.clone().into_order(id));
        self.commits.fetch_add(1, Ordering::SeqCst);

        Ok(id)
    }

    async fn insert_batch(&self, orders: &[NewOrder]) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        self.check_connection("insert_batch")?;

        table.rows.reserve(orders.len());
        for order in orders {
            table.next_id += 1;
            let id = table.next_id;
            table.rows.push(order.clone().into_order(id));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);

        Ok(orders.len() as u64)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}
