//! Blocking port registry facade.
//!
//! Wraps the async [`PlatformRegistryService`] in a single-threaded tokio
//! runtime so callers without a runtime (GUI hosts, FFI layers, simple
//! scripts) can call every operation synchronously.

use tokio::runtime::{Builder, Runtime};
use tracing::warn;

use crate::application::PlatformRegistryService;
use crate::config::{ConfigStore, RegistryConfig};
use crate::domain::{PortEntry, TelemetrySnapshot, TerminationMode, TerminationResult};
use crate::error::{Error, Result};

/// The port registry for the current platform.
///
/// Must not be used from inside another tokio runtime; use
/// [`PlatformRegistryService`] there instead.
pub struct PortRegistry {
    service: PlatformRegistryService,
    config: RegistryConfig,
    runtime: Runtime,
}

impl PortRegistry {
    /// Create a registry with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry using the configuration saved at the default path.
    pub fn from_saved_config() -> Result<Self> {
        Self::from_store(&ConfigStore::new()?)
    }

    /// Create a registry using the configuration held by `store`.
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        let runtime = Self::build_runtime()?;
        let config = runtime.block_on(store.load())?;
        Self::assemble(runtime, config)
    }

    /// Create a registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        Self::assemble(Self::build_runtime()?, config)
    }

    fn build_runtime() -> Result<Runtime> {
        Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("Failed to create runtime: {}", e)))
    }

    fn assemble(runtime: Runtime, config: RegistryConfig) -> Result<Self> {
        let service = PlatformRegistryService::platform_with_config(&config);

        // Take the CPU baseline now so the first telemetry call covers a
        // real window. The sampler retries lazily if this fails.
        if let Err(e) = service.init_telemetry() {
            warn!(error = %e, "CPU sampler initialization failed");
        }

        Ok(Self {
            service,
            config,
            runtime,
        })
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// List every listening port with its owning process.
    pub fn snapshot_ports(&self) -> Result<Vec<PortEntry>> {
        self.runtime.block_on(self.service.snapshot_ports())
    }

    /// Forcefully terminate a process and verify it exited.
    pub fn terminate(&self, pid: u32) -> TerminationResult {
        self.runtime.block_on(self.service.terminate(pid))
    }

    /// Terminate a process using the given mode.
    pub fn terminate_with(&self, pid: u32, mode: TerminationMode) -> TerminationResult {
        self.runtime.block_on(self.service.terminate_with(pid, mode))
    }

    /// Aggregate CPU usage since the previous call plus current memory.
    pub fn snapshot_telemetry(&self) -> Result<TelemetrySnapshot> {
        self.service.snapshot_telemetry()
    }

    /// Ports currently held by a process.
    pub fn find_by_pid(&self, pid: u32) -> Result<Vec<PortEntry>> {
        self.runtime.block_on(self.service.find_by_pid(pid))
    }

    /// Entries bound to a port number.
    pub fn find_by_port(&self, port: u16) -> Result<Vec<PortEntry>> {
        self.runtime.block_on(self.service.find_by_port(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TerminationOutcome;

    #[test]
    fn test_registry_creation() {
        let registry = PortRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_with_config_keeps_config() {
        let config = RegistryConfig {
            unknown_process_label: "n/a".to_string(),
            ..Default::default()
        };
        let registry = PortRegistry::with_config(config.clone()).unwrap();
        assert_eq!(registry.config(), &config);
    }

    #[test]
    fn test_from_store_applies_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("config.json"));

        // Missing file means defaults.
        let registry = PortRegistry::from_store(&store).unwrap();
        assert_eq!(registry.config(), &RegistryConfig::default());

        let config = RegistryConfig {
            unknown_process_label: "kernel".to_string(),
            ..Default::default()
        };
        let runtime = PortRegistry::build_runtime().unwrap();
        runtime.block_on(store.save(&config)).unwrap();

        let registry = PortRegistry::from_store(&store).unwrap();
        assert_eq!(registry.config().unknown_process_label, "kernel");
    }

    #[test]
    fn test_from_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::with_path(path);
        assert!(matches!(PortRegistry::from_store(&store), Err(Error::Config(_))));
    }

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn test_snapshot_ports_is_ordered() {
        let registry = PortRegistry::new().unwrap();
        let entries = registry.snapshot_ports().unwrap();

        for pair in entries.windows(2) {
            assert!(pair[0].sort_key() < pair[1].sort_key());
        }
    }

    #[test]
    fn test_snapshot_telemetry_invariants() {
        let registry = PortRegistry::new().unwrap();

        for _ in 0..2 {
            let snapshot = registry.snapshot_telemetry().unwrap();
            assert!(snapshot.cpu_usage_percent >= 0.0);
            assert!(snapshot.memory_used_bytes <= snapshot.memory_total_bytes);
            assert!(snapshot.memory_total_bytes > 0);
        }
    }

    #[test]
    fn test_terminate_nonexistent_pid() {
        let registry = PortRegistry::new().unwrap();

        let result = registry.terminate(4_000_000_000);
        assert_eq!(result.outcome, TerminationOutcome::NotFound);
    }

    #[test]
    fn test_terminate_self_is_denied() {
        let registry = PortRegistry::new().unwrap();

        let result = registry.terminate(std::process::id());
        assert_eq!(result.outcome, TerminationOutcome::PermissionDenied);
    }
}
