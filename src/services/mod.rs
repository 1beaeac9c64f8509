//! Services module
//!
//! This module contains business logic services

pub mod admin;
pub mod auth;
pub mod deadline;
pub mod homework;
pub mod maintenance;
pub mod notifier;

// Re-export commonly used services
pub use admin::AdminService;
pub use auth::AuthService;
pub use deadline::Phase;
pub use homework::HomeworkService;
pub use maintenance::{MaintenanceCoordinator, MaintenanceStatus, MaintenanceWindow, SyncOperation};
pub use notifier::{Notifier, TickReport};

use std::sync::Arc;

use crate::api::PlatformClient;
use crate::config::Settings;
use crate::storage::SnapshotStore;
use crate::sync::SyncService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub homework_service: HomeworkService,
    pub admin_service: AdminService,
    pub sync_service: SyncService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, store: Arc<SnapshotStore>) -> Result<Self> {
        let client = PlatformClient::new(&settings.api)?;
        let auth_service = AuthService::new(store.clone());
        let homework_service = HomeworkService::new(store.clone(), auth_service.clone());
        let admin_service = AdminService::new(store.clone());
        let sync_service = SyncService::new(client, store, settings.api.clone(), settings.sync);

        Ok(Self {
            auth_service,
            homework_service,
            admin_service,
            sync_service,
        })
    }
}
