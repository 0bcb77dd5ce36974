use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::NewOrder;
use crate::repository::OrderRepository;
use crate::{CoreError, CoreResult};

/// How generated orders reach the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// One `insert_one` call (and commit) per record
    Naive,
    /// Every record staged in memory, then a single `insert_batch`
    Optimized,
}

impl InsertMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertMode::Naive => "naive",
            InsertMode::Optimized => "optimized",
        }
    }
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkInsertReport {
    pub inserted: i64,
    pub mode: InsertMode,
}

/// Turn the caller's `count` into the number of records to generate.
///
/// There is no built-in ceiling; `max_count` is only enforced when an operator
/// configured one. Negative counts generate nothing.
pub fn plan_count(requested: i64, max_count: Option<i64>) -> CoreResult<usize> {
    if let Some(max) = max_count {
        if requested > max {
            return Err(CoreError::InvalidInput(format!(
                "count {} exceeds the configured maximum of {}",
                requested, max
            )));
        }
    }

    if requested < 0 {
        warn!("Negative bulk count {} requested, nothing will be inserted", requested);
        return Ok(0);
    }

    usize::try_from(requested)
        .map_err(|_| CoreError::InvalidInput(format!("count {} is too large", requested)))
}

/// Build the in-memory batch for optimized mode.
///
/// The buffer is reserved fallibly so an oversized count becomes an error
/// instead of a capacity panic or an allocator abort.
pub fn stage_orders(count: usize) -> CoreResult<Vec<NewOrder>> {
    let mut orders = Vec::new();
    orders.try_reserve(count).map_err(|e| {
        CoreError::OutOfMemory(format!("cannot stage {} orders: {}", count, e))
    })?;

    for index in 0..count {
        orders.push(NewOrder::numbered(index));
    }
    Ok(orders)
}

/// Generate the requested number of numbered orders and write them using `mode`.
///
/// The report echoes `requested` unchanged, including negative values, for
/// which nothing is written. Naive mode stops at the first failed commit; rows
/// committed before it stay in the store.
pub async fn bulk_insert(
    repo: &dyn OrderRepository,
    mode: InsertMode,
    requested: i64,
    max_count: Option<i64>,
) -> CoreResult<BulkInsertReport> {
    let count = plan_count(requested, max_count)?;
    let started = Instant::now();

    match mode {
        InsertMode::Naive => {
            for index in 0..count {
                repo.insert_one(&NewOrder::numbered(index)).await?;
            }
        }
        InsertMode::Optimized => {
            let orders = stage_orders(count)?;
            repo.insert_batch(&orders).await?;
        }
    }

    info!(
        mode = mode.as_str(),
        rows = count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Bulk insert finished"
    );

    Ok(BulkInsertReport {
        inserted: requested,
        mode,
    })
}
