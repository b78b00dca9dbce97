//! Invoice issuing workflow
//!
//! Orchestrates the full invoice lifecycle: precondition checks in a
//! fixed order, the customer snapshot, sequential number allocation and
//! the atomic write that links invoice and order.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::BusinessConfig;
use crate::db::models::{
    ElectronicInvoice, Invoice, InvoiceCreate, InvoiceCustomer, InvoiceItem, InvoiceStatus,
    InvoiceTotals, IssuerInfo, Order,
};
use crate::db::repository::{
    InvoiceRepository, OrderRepository, RepoError, SequenceRepository, UserRepository,
};
use crate::invoicing::number;
use crate::utils::{AppError, AppResult, time};

/// Name of the counter backing invoice numbers
pub const INVOICE_SEQUENCE: &str = "invoice";

/// Attempts before giving up on a unique number. Conflicts only happen
/// while the counter catches up with pre-existing invoices.
const MAX_NUMBER_ATTEMPTS: u32 = 3;

pub struct InvoiceIssuer {
    db: Surreal<Db>,
    business: BusinessConfig,
}

impl InvoiceIssuer {
    pub fn new(db: Surreal<Db>, business: BusinessConfig) -> Self {
        Self { db, business }
    }

    /// Issue an invoice for an order and mark the order paid.
    ///
    /// Precondition failures keep their order: missing fields, unknown
    /// order, already-invoiced order, then the actor's role. Nothing is
    /// written unless every check passes.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        req: InvoiceCreate,
    ) -> AppResult<(Invoice, Order)> {
        let order_id = req
            .order_id
            .clone()
            .ok_or_else(|| AppError::validation("orderId is required"))?;
        let payment_method = req
            .payment_method
            .ok_or_else(|| AppError::validation("paymentMethod is required"))?;

        let orders = OrderRepository::new(self.db.clone());
        let order = orders
            .find_by_id(&order_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

        if order.invoice.is_some() {
            return Err(AppError::conflict("Order already has an invoice"));
        }

        if !actor.role.can_issue_invoices() {
            return Err(AppError::forbidden("Only cashiers and administrators can issue invoices"));
        }

        let customer = self.resolve_customer(&order, &req).await?;
        let items = snapshot_items(&order);
        let totals = InvoiceTotals {
            subtotal: order.bills.subtotal,
            total_tax: order.bills.tax,
            total: order.bills.total,
        };
        let issuer = IssuerInfo {
            business_name: self.business.name.clone(),
            nit: self.business.nit.clone(),
            address: self.business.address.clone(),
            phone: self.business.phone.clone(),
            email: self.business.email.clone(),
        };
        let processed_by: RecordId = actor
            .id
            .parse()
            .map_err(|_| AppError::internal(format!("Invalid actor id: {}", actor.id)))?;

        let invoices = InvoiceRepository::new(self.db.clone());
        let sequence = SequenceRepository::new(self.db.clone());

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let value = sequence.next(INVOICE_SEQUENCE).await?;
            let invoice_number = number::format_number(value);

            let invoice = Invoice {
                id: Some(RecordId::from_table_key(
                    "invoice",
                    Uuid::new_v4().simple().to_string(),
                )),
                invoice_number: invoice_number.clone(),
                issuer: issuer.clone(),
                customer: customer.clone(),
                invoice_date: time::now_rfc3339(),
                payment_type: req.payment_type.unwrap_or_default(),
                payment_method,
                items: items.clone(),
                totals: totals.clone(),
                electronic: ElectronicInvoice {
                    is_electronic: req.is_electronic,
                    ..Default::default()
                },
                order: order_id.clone(),
                processed_by: processed_by.clone(),
                status: InvoiceStatus::Issued,
                notes: req.notes.clone(),
                created_at: time::now_rfc3339(),
            };

            match invoices.create_with_order(invoice, order_id.clone()).await {
                Ok((invoice, order)) => {
                    tracing::info!(
                        invoice_number = %invoice.invoice_number,
                        order = %order_id,
                        processed_by = %actor.id,
                        "Invoice issued"
                    );
                    return Ok((invoice, order));
                }
                Err(RepoError::Duplicate(msg)) => {
                    tracing::warn!(
                        attempt,
                        number = %invoice_number,
                        error = %msg,
                        "Invoice number collision, advancing sequence"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::conflict(
            "Could not allocate a unique invoice number",
        ))
    }

    /// Void an invoice and put its order back into the awaiting-payment
    /// state. Administrators only; voiding is terminal.
    pub async fn cancel(
        &self,
        actor: &CurrentUser,
        invoice_id: &str,
        reason: Option<String>,
    ) -> AppResult<Invoice> {
        let invoices = InvoiceRepository::new(self.db.clone());
        let invoice = invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", invoice_id)))?;

        if invoice.status == InvoiceStatus::Voided {
            return Err(AppError::conflict("Invoice is already voided"));
        }

        if !actor.is_admin() {
            return Err(AppError::forbidden("Only administrators can void invoices"));
        }

        let id = invoice
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Stored invoice has no id"))?;
        let voided = invoices
            .void_with_order(id, invoice.order.clone(), reason)
            .await?;

        tracing::info!(
            invoice_number = %voided.invoice_number,
            order = %voided.order,
            voided_by = %actor.id,
            "Invoice voided"
        );
        Ok(voided)
    }

    /// Raise the number sequence past any invoice already on disk. Run
    /// at startup so restored backups never cause number reuse.
    pub async fn seed_sequence(db: &Surreal<Db>) -> AppResult<()> {
        let invoices = InvoiceRepository::new(db.clone());
        let sequence = SequenceRepository::new(db.clone());

        if let Some(newest) = invoices.find_newest_number().await?
            && let Some(value) = number::parse_number(&newest)
        {
            let seeded = sequence.ensure_at_least(INVOICE_SEQUENCE, value).await?;
            tracing::info!(floor = value, value = seeded, "Invoice sequence seeded");
        }
        Ok(())
    }

    /// Resolve the customer snapshot, in priority order: registered
    /// customer on the order, explicit override in the request, inline
    /// order data, then the consumer defaults.
    async fn resolve_customer(
        &self,
        order: &Order,
        req: &InvoiceCreate,
    ) -> AppResult<InvoiceCustomer> {
        if let Some(ref user_ref) = order.customer.user {
            let users = UserRepository::new(self.db.clone());
            if let Some(user) = users.find_by_id(&user_ref.to_string()).await? {
                let billing = user.customer_data.unwrap_or_default();
                return Ok(InvoiceCustomer {
                    user: Some(user_ref.clone()),
                    name: billing.billing_name.unwrap_or(user.name),
                    nit: billing
                        .nit
                        .unwrap_or_else(|| self.business.default_customer_nit.clone()),
                    address: billing.address,
                    phone: user.phone,
                    email: Some(user.email),
                });
            }
        }

        if let Some(ref data) = req.customer_data {
            return Ok(InvoiceCustomer {
                user: None,
                name: data.name.clone(),
                nit: data
                    .nit
                    .clone()
                    .unwrap_or_else(|| self.business.default_customer_nit.clone()),
                address: data.address.clone(),
                phone: data.phone.clone(),
                email: data.email.clone(),
            });
        }

        let name = if order.customer.name.is_empty() {
            self.business.default_customer_name.clone()
        } else {
            order.customer.name.clone()
        };
        let phone = if order.customer.phone.is_empty() {
            None
        } else {
            Some(order.customer.phone.clone())
        };
        Ok(InvoiceCustomer {
            user: None,
            name,
            nit: self.business.default_customer_nit.clone(),
            address: None,
            phone,
            email: None,
        })
    }
}

/// Derive invoice lines from order items. Line subtotal and tax are
/// computed here; the document totals still come from the order bills
/// untouched, even when they disagree with the lines.
fn snapshot_items(order: &Order) -> Vec<InvoiceItem> {
    order
        .items
        .iter()
        .map(|item| {
            let subtotal = item.price * item.quantity as f64;
            InvoiceItem {
                description: item.name.clone(),
                quantity: item.quantity,
                code: item.code.clone().unwrap_or_default(),
                unit_price: item.price,
                subtotal,
                tax_rate: item.tax_rate,
                tax_amount: subtotal * item.tax_rate / 100.0,
            }
        })
        .collect()
}
