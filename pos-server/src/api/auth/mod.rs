//! Auth API module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub use handler::{LoginRequest, LoginResponse};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
