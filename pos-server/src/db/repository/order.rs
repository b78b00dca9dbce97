//! Order Repository
//!
//! CRUD access to orders. The invoice link and payment fields are only
//! mutated by the invoicing workflow, inside its transaction.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderCustomer, OrderStatus, OrderUpdate, PaymentStatus};
use crate::utils::time;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find orders, newest first, optionally filtered by status
    pub async fn find_all(
        &self,
        status: Option<OrderStatus>,
        limit: Option<usize>,
    ) -> RepoResult<Vec<Order>> {
        let sql = if status.is_some() {
            "SELECT * FROM order WHERE orderStatus = $status ORDER BY orderDate DESC LIMIT $limit"
        } else {
            "SELECT * FROM order ORDER BY orderDate DESC LIMIT $limit"
        };
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        let orders: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("status", status))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Create a new order in PENDING state
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let now = time::now_rfc3339();
        let order = Order {
            id: None,
            customer: OrderCustomer {
                user: data.customer.user,
                name: data.customer.name,
                phone: data.customer.phone,
                guests: data.customer.guests,
            },
            order_status: OrderStatus::Pending,
            order_date: now.clone(),
            items: data.items,
            bills: data.bills,
            table: data.table,
            payment_status: PaymentStatus::Pending,
            invoice: None,
            waiter: data.waiter,
            notes: data.notes,
            created_at: now.clone(),
            updated_at: now,
        };

        let created: Option<Order> = self.base.db().create("order").content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Merge-update an order (status, items, bills, table, notes)
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let mut patch = serde_json::to_value(&data)
            .map_err(|e| RepoError::Database(format!("Failed to serialize update: {}", e)))?;
        patch["updatedAt"] = serde_json::Value::String(time::now_rfc3339());

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $patch RETURN AFTER")
            .bind(("thing", thing))
            .bind(("patch", patch))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete an order
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        // An invoiced order is part of the fiscal trail
        if existing.invoice.is_some() {
            return Err(RepoError::Validation(
                "Cannot delete an invoiced order".to_string(),
            ));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
