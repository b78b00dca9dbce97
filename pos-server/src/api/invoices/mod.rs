//! Invoice API module
//!
//! | Path | Method | Notes |
//! |------|--------|-------|
//! | /api/invoices | GET | filtered list |
//! | /api/invoices | POST | issue for an order |
//! | /api/invoices/{id} | GET | detail |
//! | /api/invoices/{id}/cancel | POST | void, admin only |
//! | /api/customers/{customerId}/invoices | GET | per-customer history |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/invoices", routes())
        .route(
            "/api/customers/{customer_id}/invoices",
            get(handler::list_by_customer),
        )
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
}
