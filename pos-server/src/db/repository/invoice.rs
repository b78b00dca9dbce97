//! Invoice Repository
//!
//! Reads plus the two transactional mutations of the invoicing
//! workflow. Invoice creation and the paired order update commit in a
//! single transaction, as does cancellation with its order revert.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Invoice, InvoiceFilter, Order};
use crate::utils::time;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find invoice by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Invoice>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let invoice: Option<Invoice> = self.base.db().select(thing).await?;
        Ok(invoice)
    }

    /// Number of the newest invoice by creation time, used to seed the
    /// number sequence at startup
    pub async fn find_newest_number(&self) -> RepoResult<Option<String>> {
        #[derive(serde::Deserialize)]
        struct NumberRow {
            #[serde(rename = "invoiceNumber")]
            invoice_number: String,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT invoiceNumber FROM invoice ORDER BY createdAt DESC LIMIT 1")
            .await?;
        let rows: Vec<NumberRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.invoice_number))
    }

    /// List invoices with optional date range, customer NIT and status
    /// filters, newest first. Date bounds must already be normalized to
    /// the canonical timestamp format.
    pub async fn find_filtered(&self, filter: InvoiceFilter) -> RepoResult<Vec<Invoice>> {
        let mut clauses: Vec<&str> = Vec::new();
        if filter.start_date.is_some() {
            clauses.push("invoiceDate >= $start_date");
        }
        if filter.end_date.is_some() {
            clauses.push("invoiceDate <= $end_date");
        }
        if filter.customer_nit.is_some() {
            clauses.push("customer.nit = $customer_nit");
        }
        if filter.status.is_some() {
            clauses.push("status = $status");
        }

        let mut sql = String::from("SELECT * FROM invoice");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY invoiceDate DESC LIMIT $limit");

        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("start_date", filter.start_date))
            .bind(("end_date", filter.end_date))
            .bind(("customer_nit", filter.customer_nit))
            .bind(("status", filter.status))
            .bind(("limit", limit))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices)
    }

    /// All invoices issued to a registered customer, newest first
    pub async fn find_by_customer(&self, user_id: &RecordId) -> RepoResult<Vec<Invoice>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE customer.user = $user ORDER BY invoiceDate DESC")
            .bind(("user", user_id.to_string()))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices)
    }

    /// Persist a new invoice and mark its order paid, atomically.
    ///
    /// The invoice id must be pre-generated so both statements can
    /// reference it. A unique index violation on the invoice number
    /// maps to [`RepoError::Duplicate`] so the caller can retry with a
    /// fresh number.
    pub async fn create_with_order(
        &self,
        invoice: Invoice,
        order_id: RecordId,
    ) -> RepoResult<(Invoice, Order)> {
        let invoice_id = invoice
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Invoice id must be set".to_string()))?;

        // The record id travels in the CREATE target, not the content
        let mut content = invoice;
        content.id = None;

        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                CREATE $invoice_id CONTENT $invoice;
                UPDATE $order_id SET
                    paymentStatus = 'PAID',
                    orderStatus = 'PAID',
                    invoice = $invoice_ref,
                    updatedAt = $now;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("invoice_id", invoice_id.clone()))
            .bind(("invoice", content))
            .bind(("order_id", order_id))
            .bind(("invoice_ref", invoice_id.to_string()))
            .bind(("now", time::now_rfc3339()))
            .await?;

        let created: Option<Invoice> = result.take(0).map_err(map_number_conflict)?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))?;

        let updated: Vec<Order> = result.take(1).map_err(map_number_conflict)?;
        let order = updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to update order".to_string()))?;

        Ok((created, order))
    }

    /// Void an invoice and revert its order, atomically. The order goes
    /// back to awaiting payment while keeping its delivered state; the
    /// invoice link stays so the fiscal trail is preserved.
    pub async fn void_with_order(
        &self,
        invoice_id: RecordId,
        order_id: RecordId,
        reason: Option<String>,
    ) -> RepoResult<Invoice> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                UPDATE $invoice_id SET
                    status = 'VOIDED',
                    notes = $reason OR notes;
                UPDATE $order_id SET
                    paymentStatus = 'PENDING',
                    orderStatus = 'DELIVERED',
                    updatedAt = $now;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("invoice_id", invoice_id.clone()))
            .bind(("order_id", order_id))
            .bind(("reason", reason))
            .bind(("now", time::now_rfc3339()))
            .await?;

        let voided: Vec<Invoice> = result.take(0)?;
        voided
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", invoice_id)))
    }
}

/// Unique index violations on the invoice number surface as database
/// errors mentioning the index; narrow those to Duplicate.
fn map_number_conflict(err: surrealdb::Error) -> RepoError {
    let message = err.to_string();
    if message.contains("invoice_number_idx") || message.contains("invoiceNumber") {
        RepoError::Duplicate(message)
    } else {
        RepoError::Database(message)
    }
}
