//! POS Server - point-of-sale backend
//!
//! # Overview
//!
//! - **Database** (`db`): embedded SurrealDB storage for users, orders
//!   and invoices
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **Invoicing** (`invoicing`): sequential invoice numbers and the
//!   atomic issue/void workflow
//! - **HTTP API** (`api`): RESTful interface under `/api`
//!
//! # Module structure
//!
//! ```text
//! pos-server/src/
//! ├── core/       # configuration, state, server lifecycle
//! ├── auth/       # JWT authentication, role middleware
//! ├── api/        # HTTP routes and handlers
//! ├── invoicing/  # invoice numbers and issuing workflow
//! ├── db/         # models and repositories
//! └── utils/      # errors, logging, time helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod invoicing;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{BusinessConfig, Config, Server, ServerState};
pub use invoicing::InvoiceIssuer;
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, working directory and logs
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());
    std::fs::create_dir_all(&work_dir)?;
    let log_dir = format!("{}/logs", work_dir);
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_logger_with_file(Some(&log_level), Some(&log_dir));
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____    _____
   / __ \/ __ \/ ___/   / ___/___  ______   _____  _____
  / /_/ / / / /\__ \    \__ \/ _ \/ ___/ | / / _ \/ ___/
 / ____/ /_/ /___/ /   ___/ /  __/ /   | |/ /  __/ /
/_/    \____//____/   /____/\___/_/    |___/\___/_/
    "#
    );
}
