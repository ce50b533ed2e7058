//! Business logic services

pub mod catalog;
pub mod dashboard;
pub mod loans;
pub mod session;

use crate::{config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub dashboard: dashboard::DashboardService,
    pub session: session::SessionService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        loans_config: LoansConfig,
        session_service: session::SessionService,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), loans_config),
            dashboard: dashboard::DashboardService::new(repository),
            session: session_service,
        }
    }
}
