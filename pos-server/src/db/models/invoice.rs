//! Invoice Model
//!
//! Invoices are immutable point-in-time snapshots. Customer, item and
//! total data is copied from the order at issuance and never re-derived
//! afterwards, so later edits to users or orders cannot change an issued
//! document.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Invoice ID type
pub type InvoiceId = RecordId;

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Issued,
    Voided,
    CreditNote,
}

/// Payment terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Credit,
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Cash
    }
}

/// Payment method used to settle the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
    Transfer,
    Other,
}

/// Issuing business identity, copied from server config at issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerInfo {
    pub business_name: String,
    pub nit: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Customer snapshot on the invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCustomer {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<RecordId>,
    pub name: String,
    pub nit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Invoice line, derived from an order item at issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: i32,
    pub code: String,
    pub unit_price: f64,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
}

/// Totals copied verbatim from the order bills
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub total_tax: f64,
    pub total: f64,
}

/// Electronic invoicing fields, reserved for fiscal integration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectronicInvoice {
    #[serde(default)]
    pub is_electronic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cufe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dian_resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_key: Option<String>,
}

/// Invoice document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<InvoiceId>,
    /// Unique sequential number, e.g. "F-0042"
    pub invoice_number: String,
    pub issuer: IssuerInfo,
    pub customer: InvoiceCustomer,
    pub invoice_date: String,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub items: Vec<InvoiceItem>,
    pub totals: InvoiceTotals,
    #[serde(default)]
    pub electronic: ElectronicInvoice,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub processed_by: RecordId,
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

/// Customer override supplied on the create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOverride {
    pub name: String,
    pub nit: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Create invoice request payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub order_id: Option<RecordId>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    pub customer_data: Option<CustomerOverride>,
    #[serde(default)]
    pub is_electronic: bool,
    pub notes: Option<String>,
}

/// List query filters for invoices
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub customer_nit: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub limit: Option<usize>,
}
