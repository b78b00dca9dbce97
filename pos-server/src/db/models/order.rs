//! Order Model
//!
//! Orders keep their customer inline (walk-in) or as a reference to a
//! registered user, plus precomputed bill totals supplied by the caller.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order ID type
pub type OrderId = RecordId;

/// Order status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InPreparation,
    Ready,
    Delivered,
    Paid,
    Canceled,
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Partial,
}

/// Order customer: registered reference and/or inline walk-in data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user: Option<RecordId>,
    pub name: String,
    pub phone: String,
    pub guests: i32,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Tax rate in percent. Defaults to 19 when absent on input; the
    /// invoice snapshot copies this value verbatim.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_tax_rate() -> f64 {
    19.0
}

/// Precomputed bill totals (supplied by the caller, never re-derived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bills {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<OrderId>,
    pub customer: OrderCustomer,
    pub order_status: OrderStatus,
    pub order_date: String,
    pub items: Vec<OrderItem>,
    pub bills: Bills,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub payment_status: PaymentStatus,
    /// At most one linked invoice; once set, invoice creation is rejected
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub invoice: Option<RecordId>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub waiter: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer: OrderCustomer,
    pub items: Vec<OrderItem>,
    pub bills: Bills,
    pub table: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub waiter: Option<RecordId>,
    pub notes: Option<String>,
}

/// Update order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bills: Option<Bills>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
