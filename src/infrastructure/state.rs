//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{ComponentRepository, KitRepository, LoanRepository};
use crate::infrastructure::{
    SeaOrmComponentRepository, SeaOrmKitRepository, SeaOrmLoanRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Display name reported by the info endpoints
    pub app_name: Arc<str>,
    pub component_repo: Arc<dyn ComponentRepository>,
    pub kit_repo: Arc<dyn KitRepository>,
    pub loan_repo: Arc<dyn LoanRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_name(db, "TI-LAB Backend")
    }

    pub fn with_name(db: DatabaseConnection, app_name: &str) -> Self {
        let component_repo = Arc::new(SeaOrmComponentRepository::new(db.clone()));
        let kit_repo = Arc::new(SeaOrmKitRepository::new(db.clone()));
        let loan_repo = Arc::new(SeaOrmLoanRepository::new(db.clone()));

        Self {
            db,
            app_name: Arc::from(app_name),
            component_repo,
            kit_repo,
            loan_repo,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
