//! POS Client - HTTP client for the POS server
//!
//! Thin wrapper over the REST API: bearer-token auth plus typed helpers
//! for the invoice and order endpoints.

pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use types::{
    CancelInvoiceRequest, CreateInvoiceRequest, CustomerData, InvoiceListParams, LoginResponse,
    UserInfo,
};
