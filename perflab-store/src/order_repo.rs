use async_trait::async_trait;
use perflab_core::{NewOrder, OrderRepository, StoreError};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

/// Rows per multi-row INSERT. Three binds per row keeps each statement well
/// under the PostgreSQL limit of 65535 bind parameters.
const ROWS_PER_STATEMENT: usize = 10_000;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert_one(&self, order: &NewOrder) -> Result<i64, StoreError> {
        // Executed on the pool directly, so the statement autocommits
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (customer, amount, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&order.customer)
        .bind(order.amount)
        .bind(order.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::failure("insert_one", e))?;

        Ok(id)
    }

    async fn insert_batch(&self, orders: &[NewOrder]) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::failure("insert_batch", e))?;

        let mut written = 0;
        for chunk in orders.chunks(ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO orders (customer, amount, created_at) ");
            builder.push_values(chunk, |mut row, order| {
                row.push_bind(order.customer.clone())
                    .push_bind(order.amount)
                    .push_bind(order.created_at);
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::failure("insert_batch", e))?;
            written += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::failure("insert_batch", e))?;

        debug!("Committed batch of {} orders", written);
        Ok(written)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::failure("count", e))?;

        Ok(total)
    }
}
