use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted order row. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// An order staged for insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(customer: String, amount: Decimal) -> Self {
        Self {
            customer,
            amount,
            created_at: Utc::now(),
        }
    }

    /// Generated demo record: `Customer-{index}` with amount `index`.
    pub fn numbered(index: usize) -> Self {
        Self::new(format!("Customer-{}", index), Decimal::from(index))
    }

    /// Attach the id handed out by the store
    pub fn into_order(self, id: i64) -> Order {
        Order {
            id,
            customer: self.customer,
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}
