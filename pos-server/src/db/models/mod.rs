//! Database models

pub mod invoice;
pub mod order;
pub mod serde_helpers;
pub mod user;

pub use invoice::{
    CustomerOverride, ElectronicInvoice, Invoice, InvoiceCreate, InvoiceCustomer, InvoiceFilter,
    InvoiceId, InvoiceItem, InvoiceStatus, InvoiceTotals, IssuerInfo, PaymentMethod, PaymentType,
};
pub use order::{
    Bills, Order, OrderCreate, OrderCustomer, OrderId, OrderItem, OrderStatus, OrderUpdate,
    PaymentStatus,
};
pub use user::{CustomerData, Role, User, UserCreate, UserId, UserPublic, UserUpdate};
