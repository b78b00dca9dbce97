use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{Role, UserCreate};
use crate::db::repository::UserRepository;
use crate::invoicing::InvoiceIssuer;

/// Server state, holds shared references to every service.
///
/// Cloning is cheap: the database handle and JWT service are shared.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Initialize the server state.
    ///
    /// Opens the database, applies schema, seeds the invoice number
    /// sequence from existing data and bootstraps the first
    /// administrator when the user table is empty.
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or seeded.
    pub async fn initialize(config: &Config) -> Self {
        std::fs::create_dir_all(&config.work_dir).expect("Failed to create work directory");

        let db_service = DbService::new(&config.db_path())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        InvoiceIssuer::seed_sequence(&db)
            .await
            .expect("Failed to seed invoice sequence");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db, jwt_service);
        state
            .bootstrap_admin()
            .await
            .expect("Failed to bootstrap administrator");
        state
    }

    /// Create the first administrator when no users exist yet
    async fn bootstrap_admin(&self) -> Result<(), crate::utils::AppError> {
        let users = UserRepository::new(self.get_db());
        if !users.find_all().await?.is_empty() {
            return Ok(());
        }

        let email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@pos.local".to_string());
        let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("ADMIN_PASSWORD not set, using the default development password");
            "admin123".to_string()
        });

        users
            .create(UserCreate {
                name: "Administrator".to_string(),
                email: email.clone(),
                phone: None,
                password,
                role: Role::Administrator,
                customer_data: None,
            })
            .await?;
        tracing::info!(email = %email, "Bootstrapped initial administrator");
        Ok(())
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Invoice issuing workflow bound to this state
    pub fn invoice_issuer(&self) -> InvoiceIssuer {
        InvoiceIssuer::new(self.get_db(), self.config.business.clone())
    }
}
