//! Maintenance mode coordination
//!
//! A process-wide state machine with exactly two states: idle, or running
//! one long synchronization job. While a window is open, the middleware
//! short-circuits ordinary user requests with the window's message. The
//! at-most-one-job invariant rests on holding the lock across the whole
//! check-and-set in [`MaintenanceCoordinator::start`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Which synchronization job a maintenance window is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Mentors,
    Homeworks,
}

impl SyncOperation {
    /// Genitive form used in the templated user message.
    fn base_name(&self) -> &'static str {
        match self {
            SyncOperation::Mentors => "наставников",
            SyncOperation::Homeworks => "домашних заданий",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Mentors => "mentors",
            SyncOperation::Homeworks => "homeworks",
        }
    }
}

/// Snapshot of the maintenance state. `active == false` implies every
/// other field is cleared.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceStatus {
    pub active: bool,
    pub operation: Option<SyncOperation>,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_minutes: Option<u64>,
    pub message: Option<String>,
}

/// Message shown outside maintenance windows.
const IDLE_MESSAGE: &str = "Бот работает в обычном режиме.";

/// Coordinates exclusive access to long-running synchronization jobs.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceCoordinator {
    inner: Arc<Mutex<MaintenanceStatus>>,
}

impl MaintenanceCoordinator {
    /// Create a new MaintenanceCoordinator instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a maintenance window. Returns `false` without any transition
    /// when a window is already open.
    pub fn start(
        &self,
        operation: SyncOperation,
        estimated_minutes: u64,
        custom_message: Option<String>,
    ) -> bool {
        let mut status = self.inner.lock().unwrap();

        if status.active {
            warn!(
                running = status.operation.map(|op| op.as_str()),
                requested = operation.as_str(),
                "Maintenance start rejected, a window is already open"
            );
            return false;
        }

        let message = custom_message.unwrap_or_else(|| {
            format!(
                "🔧 Бот временно недоступен\n\n\
                 Выполняется обновление базы {}.\n\
                 Примерное время: ~{} мин.\n\n\
                 Пожалуйста, подождите. Бот автоматически возобновит работу после завершения.",
                operation.base_name(),
                estimated_minutes
            )
        });

        status.active = true;
        status.operation = Some(operation);
        status.started_at = Some(Utc::now());
        status.estimated_minutes = Some(estimated_minutes);
        status.message = Some(message);

        info!(
            operation = operation.as_str(),
            estimated_minutes = estimated_minutes,
            "Maintenance mode enabled"
        );
        true
    }

    /// Close the maintenance window. Returns `false` when none is open.
    pub fn stop(&self) -> bool {
        let mut status = self.inner.lock().unwrap();

        if !status.active {
            warn!("Maintenance stop requested, but no window is open");
            return false;
        }

        let operation = status.operation.map(|op| op.as_str());
        let elapsed_minutes = status
            .started_at
            .map(|started| (Utc::now() - started).num_seconds() as f64 / 60.0);

        *status = MaintenanceStatus::default();

        info!(
            operation = operation,
            elapsed_minutes = elapsed_minutes,
            "Maintenance mode disabled"
        );
        true
    }

    /// Open a window and get a guard that closes it when dropped, so the
    /// gate is released on every exit path of the protected job. `None`
    /// when a window is already open.
    pub fn begin(
        &self,
        operation: SyncOperation,
        estimated_minutes: u64,
        custom_message: Option<String>,
    ) -> Option<MaintenanceWindow> {
        if self.start(operation, estimated_minutes, custom_message) {
            Some(MaintenanceWindow {
                coordinator: self.clone(),
            })
        } else {
            None
        }
    }

    /// Whether a maintenance window is currently open.
    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().active
    }

    /// Owned copy of the current status.
    pub fn status(&self) -> MaintenanceStatus {
        self.inner.lock().unwrap().clone()
    }

    /// Text shown to users: the window's message while active, a fixed
    /// default otherwise.
    pub fn user_message(&self) -> String {
        let status = self.inner.lock().unwrap();

        if !status.active {
            return IDLE_MESSAGE.to_string();
        }

        status
            .message
            .clone()
            .unwrap_or_else(|| "🔧 Бот временно недоступен".to_string())
    }
}

/// RAII handle for an open maintenance window.
#[must_use = "dropping the window immediately would close maintenance mode"]
pub struct MaintenanceWindow {
    coordinator: MaintenanceCoordinator,
}

impl Drop for MaintenanceWindow {
    fn drop(&mut self) {
        if !self.coordinator.stop() {
            warn!("Maintenance window dropped but the gate was already released");
        }
    }
}
