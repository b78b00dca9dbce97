//! Invoicing domain
//!
//! Sequential invoice numbers and the issuing workflow that snapshots
//! orders into immutable fiscal documents.

pub mod issuer;
pub mod number;

pub use issuer::{INVOICE_SEQUENCE, InvoiceIssuer};
pub use number::{format_number, parse_number};
