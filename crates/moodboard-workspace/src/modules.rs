//! Module activation service
//!
//! Installing or removing a node type module goes through a remote
//! registration call in the full product. This service stands that call
//! in with a fixed artificial delay, then applies the synchronous
//! registry toggle. The registry handle is shared with the live editor,
//! so a finished install shows up in the palette immediately.

use std::time::Duration;

use board_engine::{InstallChange, SharedRegistry, UninstallChange};

use crate::error::Result;

/// Artificial latency standing in for the remote registration call
pub const REGISTRATION_DELAY: Duration = Duration::from_millis(450);

/// Installs and uninstalls node type modules against a shared registry
#[derive(Clone)]
pub struct ModuleService {
    registry: SharedRegistry,
    delay: Duration,
}

impl ModuleService {
    /// Create a service with the standard registration delay
    pub fn new(registry: SharedRegistry) -> Self {
        Self::with_delay(registry, REGISTRATION_DELAY)
    }

    /// Create a service with a custom registration delay
    pub fn with_delay(registry: SharedRegistry, delay: Duration) -> Self {
        Self { registry, delay }
    }

    /// The shared registry handle
    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// Install a module
    ///
    /// Waits out the registration delay, then toggles the registry.
    /// Idempotent like the underlying registry call; unknown ids fail
    /// loudly.
    pub async fn install(&self, id: &str) -> Result<InstallChange> {
        log::debug!("Registering module '{}'", id);
        tokio::time::sleep(self.delay).await;
        let change = self.registry.write().install(id)?;
        Ok(change)
    }

    /// Uninstall a module
    ///
    /// Core types report `CoreProtected` and stay installed; nodes of the
    /// uninstalled type already on a canvas keep working.
    pub async fn uninstall(&self, id: &str) -> Result<UninstallChange> {
        log::debug!("Deregistering module '{}'", id);
        tokio::time::sleep(self.delay).await;
        let change = self.registry.write().uninstall(id)?;
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkspaceError;
    use board_engine::BoardError;

    fn make_service() -> ModuleService {
        ModuleService::with_delay(
            board_nodes::builtin_registry().into_shared(),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_install_round_trip_is_idempotent() {
        let service = make_service();

        assert_eq!(
            service.install("webhook").await.unwrap(),
            InstallChange::Installed
        );
        assert_eq!(
            service.install("webhook").await.unwrap(),
            InstallChange::AlreadyInstalled
        );
        assert!(service.registry().read().is_installed("webhook"));

        assert_eq!(
            service.uninstall("webhook").await.unwrap(),
            UninstallChange::Uninstalled
        );
        assert_eq!(
            service.uninstall("webhook").await.unwrap(),
            UninstallChange::AlreadyUninstalled
        );
    }

    #[tokio::test]
    async fn test_core_uninstall_is_silent_noop() {
        let service = make_service();

        assert_eq!(
            service.uninstall("shape").await.unwrap(),
            UninstallChange::CoreProtected
        );
        assert!(service.registry().read().is_installed("shape"));
    }

    #[tokio::test]
    async fn test_unknown_module_fails_loudly() {
        let service = make_service();

        let err = service.install("ghost-module").await.unwrap_err();
        assert!(matches!(
            err,
            WorkspaceError::Board(BoardError::UnknownType(_))
        ));
    }

    #[tokio::test]
    async fn test_install_waits_out_registration_delay() {
        let service = ModuleService::new(board_nodes::builtin_registry().into_shared());

        let start = std::time::Instant::now();
        service.install("webhook").await.unwrap();

        assert!(start.elapsed() >= REGISTRATION_DELAY);
    }
}
