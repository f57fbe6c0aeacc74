//! Port registry application service.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::{
    PlatformKiller, PlatformSocketTable, SysinfoCpuSampler, SysinfoDirectory, SysinfoMemorySource,
};
use crate::config::RegistryConfig;
use crate::domain::{
    clean_process_name, sort_and_dedup, PortEntry, TelemetrySnapshot, TerminationMode,
    TerminationResult, UNKNOWN_PID,
};
use crate::error::Result;
use crate::ports::{
    CpuSampler, MemorySource, ProcessDirectory, ProcessKillerPort, SocketTableReader,
};

use super::telemetry::TelemetryReader;
use super::terminator::ProcessTerminator;

/// The service wired to the current platform's adapters.
pub type PlatformRegistryService = PortRegistryService<
    PlatformSocketTable,
    SysinfoDirectory,
    PlatformKiller,
    SysinfoCpuSampler,
    SysinfoMemorySource,
>;

/// Application service composing socket enumeration, name resolution,
/// termination and telemetry.
///
/// Holds no snapshot state: each call reflects the system at that instant.
pub struct PortRegistryService<T, D, K, C, M>
where
    T: SocketTableReader,
    D: ProcessDirectory,
    K: ProcessKillerPort,
    C: CpuSampler,
    M: MemorySource,
{
    sockets: T,
    directory: Arc<D>,
    terminator: ProcessTerminator<K, D>,
    telemetry: TelemetryReader<C, M>,
    unknown_label: String,
}

impl PlatformRegistryService {
    /// Create a service for the current platform with default configuration.
    pub fn platform() -> Self {
        Self::platform_with_config(&RegistryConfig::default())
    }

    /// Create a service for the current platform.
    pub fn platform_with_config(config: &RegistryConfig) -> Self {
        Self::with_config(
            PlatformSocketTable::new(),
            SysinfoDirectory::new(),
            PlatformKiller::new(),
            SysinfoCpuSampler::new(),
            SysinfoMemorySource::new(),
            config,
        )
    }
}

impl<T, D, K, C, M> PortRegistryService<T, D, K, C, M>
where
    T: SocketTableReader,
    D: ProcessDirectory,
    K: ProcessKillerPort,
    C: CpuSampler,
    M: MemorySource,
{
    pub fn new(sockets: T, directory: D, killer: K, cpu: C, memory: M) -> Self {
        Self::with_config(sockets, directory, killer, cpu, memory, &RegistryConfig::default())
    }

    pub fn with_config(
        sockets: T,
        directory: D,
        killer: K,
        cpu: C,
        memory: M,
        config: &RegistryConfig,
    ) -> Self {
        let directory = Arc::new(directory);
        Self {
            sockets,
            terminator: ProcessTerminator::new(
                killer,
                Arc::clone(&directory),
                config.termination.clone(),
            ),
            directory,
            telemetry: TelemetryReader::new(cpu, memory),
            unknown_label: config.unknown_process_label.clone(),
        }
    }

    /// Take the CPU telemetry baseline.
    ///
    /// Optional: the first telemetry snapshot initializes lazily otherwise,
    /// reporting 0% for that call.
    pub fn init_telemetry(&self) -> Result<()> {
        self.telemetry.init()
    }

    /// List every listening port with its owning process.
    ///
    /// Rows whose process exited between enumeration and name resolution are
    /// dropped. A live process the directory cannot name falls back to the
    /// command name the socket table reported, and is dropped if there is
    /// none. Rows the OS could not attribute are kept under the unknown
    /// sentinel PID. Output is ordered by `(port, protocol, pid)` with no
    /// duplicate triples.
    pub async fn snapshot_ports(&self) -> Result<Vec<PortEntry>> {
        let sockets = self.sockets.read_sockets().await?;

        let pids: Vec<u32> = sockets
            .iter()
            .filter_map(|s| s.pid)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let names = self.directory.resolve_names(&pids);

        let mut dropped = 0usize;
        let mut entries: Vec<PortEntry> = sockets
            .into_iter()
            .filter_map(|socket| {
                let (pid, name) = match socket.pid {
                    Some(pid) => match names.get(&pid) {
                        Some(name) => (pid, name.clone()),
                        None => match socket.command.as_deref() {
                            Some(command) if self.directory.exists(pid) => {
                                (pid, clean_process_name(command))
                            }
                            _ => {
                                dropped += 1;
                                return None;
                            }
                        },
                    },
                    None => (UNKNOWN_PID, self.unknown_label.clone()),
                };
                Some(PortEntry::new(
                    socket.port,
                    socket.protocol,
                    pid,
                    name,
                    socket.local_address,
                ))
            })
            .collect();

        sort_and_dedup(&mut entries);

        debug!(
            entries = entries.len(),
            processes = pids.len(),
            dropped,
            "Port snapshot complete"
        );

        Ok(entries)
    }

    /// Forcefully terminate a process and verify it exited.
    pub async fn terminate(&self, pid: u32) -> TerminationResult {
        self.terminator.terminate(pid).await
    }

    /// Terminate a process using the given mode.
    pub async fn terminate_with(&self, pid: u32, mode: TerminationMode) -> TerminationResult {
        self.terminator.terminate_with(pid, mode).await
    }

    /// Aggregate CPU usage since the previous call plus current memory.
    pub fn snapshot_telemetry(&self) -> Result<TelemetrySnapshot> {
        self.telemetry.read_telemetry()
    }

    /// Ports currently held by a process.
    pub async fn find_by_pid(&self, pid: u32) -> Result<Vec<PortEntry>> {
        Ok(self
            .snapshot_ports()
            .await?
            .into_iter()
            .filter(|e| e.pid == pid)
            .collect())
    }

    /// Entries bound to a port number (TCP and UDP).
    pub async fn find_by_port(&self, port: u16) -> Result<Vec<PortEntry>> {
        Ok(self
            .snapshot_ports()
            .await?
            .into_iter()
            .filter(|e| e.port == port)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MemoryUsage, Protocol, RawSocket, TerminationOutcome};
    use crate::error::Error;
    use parking_lot::{Mutex, RwLock};
    use std::collections::{HashMap, HashSet};

    /// Mock socket table for testing.
    struct MockSockets {
        sockets: RwLock<Option<Vec<RawSocket>>>,
    }

    impl MockSockets {
        fn new(sockets: Vec<RawSocket>) -> Self {
            Self {
                sockets: RwLock::new(Some(sockets)),
            }
        }

        fn unreadable() -> Self {
            Self {
                sockets: RwLock::new(None),
            }
        }
    }

    impl SocketTableReader for MockSockets {
        async fn read_sockets(&self) -> Result<Vec<RawSocket>> {
            self.sockets
                .read()
                .clone()
                .ok_or_else(|| Error::Enumeration("permission denied".to_string()))
        }
    }

    /// Mock process table. Protected PIDs refuse to die.
    #[derive(Default)]
    struct MockProcesses {
        names: Mutex<HashMap<u32, String>>,
        protected: HashSet<u32>,
        /// Live processes whose name cannot be read.
        nameless: HashSet<u32>,
        lookups: Mutex<Vec<u32>>,
    }

    impl MockProcesses {
        fn with(procs: &[(u32, &str)]) -> Self {
            Self {
                names: Mutex::new(procs.iter().map(|(p, n)| (*p, n.to_string())).collect()),
                ..Default::default()
            }
        }
    }

    impl ProcessDirectory for MockProcesses {
        fn resolve_name(&self, pid: u32) -> Option<String> {
            self.lookups.lock().push(pid);
            self.names.lock().get(&pid).cloned()
        }

        fn exists(&self, pid: u32) -> bool {
            self.names.lock().contains_key(&pid) || self.nameless.contains(&pid)
        }
    }

    /// Killer acting on the shared mock process table.
    struct MockKiller {
        processes: Arc<MockProcesses>,
    }

    impl ProcessKillerPort for MockKiller {
        async fn kill(&self, pid: u32, _force: bool) -> Result<()> {
            if self.processes.protected.contains(&pid) {
                return Err(Error::PermissionDenied { pid });
            }
            match self.processes.names.lock().remove(&pid) {
                Some(_) => Ok(()),
                None => Err(Error::ProcessNotFound(pid)),
            }
        }
    }

    /// Delegates to the shared table so the killer and the service see the
    /// same processes.
    struct SharedProcesses(Arc<MockProcesses>);

    impl ProcessDirectory for SharedProcesses {
        fn resolve_name(&self, pid: u32) -> Option<String> {
            self.0.resolve_name(pid)
        }

        fn exists(&self, pid: u32) -> bool {
            self.0.exists(pid)
        }
    }

    struct FixedCpu(f64);

    impl CpuSampler for FixedCpu {
        fn init(&self) -> Result<()> {
            Ok(())
        }

        fn sample(&self) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct FixedMemory;

    impl MemorySource for FixedMemory {
        fn read_memory(&self) -> Result<MemoryUsage> {
            Ok(MemoryUsage {
                total_bytes: 16 * 1024,
                used_bytes: 4 * 1024,
            })
        }
    }

    type TestService =
        PortRegistryService<MockSockets, SharedProcesses, MockKiller, FixedCpu, FixedMemory>;

    fn service(
        sockets: MockSockets,
        processes: MockProcesses,
    ) -> (TestService, Arc<MockProcesses>) {
        let processes = Arc::new(processes);
        let service = PortRegistryService::new(
            sockets,
            SharedProcesses(Arc::clone(&processes)),
            MockKiller {
                processes: Arc::clone(&processes),
            },
            FixedCpu(25.0),
            FixedMemory,
        );
        (service, processes)
    }

    fn tcp(port: u16, pid: Option<u32>) -> RawSocket {
        RawSocket::new(Protocol::Tcp, port, pid)
    }

    fn udp(port: u16, pid: Option<u32>) -> RawSocket {
        RawSocket::new(Protocol::Udp, port, pid)
    }

    #[tokio::test]
    async fn test_snapshot_orders_by_port() {
        let (service, _) = service(
            MockSockets::new(vec![tcp(8080, Some(1000)), udp(53, Some(1000))]),
            MockProcesses::with(&[(1000, "dnsmasq")]),
        );

        let entries = service.snapshot_ports().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].port, 53);
        assert_eq!(entries[0].protocol, Protocol::Udp);
        assert_eq!(entries[1].port, 8080);
        assert!(entries.iter().all(|e| e.pid == 1000 && e.process_name == "dnsmasq"));
    }

    #[tokio::test]
    async fn test_snapshot_drops_vanished_and_keeps_unknown() {
        let (service, _) = service(
            MockSockets::new(vec![tcp(3000, Some(42)), tcp(22, None), tcp(80, Some(7))]),
            MockProcesses::with(&[(7, "nginx")]),
        );

        let entries = service.snapshot_ports().await.unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].port, 22);
        assert_eq!(entries[0].pid, UNKNOWN_PID);
        assert_eq!(entries[0].process_name, "unknown");
        assert!(entries[0].is_unknown_owner());

        assert_eq!(entries[1].port, 80);
        assert!(entries.iter().all(|e| e.pid != 42));
    }

    #[tokio::test]
    async fn test_snapshot_dedups_and_resolves_each_pid_once() {
        let (service, processes) = service(
            MockSockets::new(vec![
                tcp(5432, Some(9)).with_address("127.0.0.1"),
                tcp(5432, Some(9)).with_address("::1"),
                tcp(5433, Some(9)),
                tcp(1, Some(3)),
            ]),
            MockProcesses::with(&[(9, "postgres"), (3, "init")]),
        );

        let entries = service.snapshot_ports().await.unwrap();
        let keys: Vec<_> = entries.iter().map(PortEntry::sort_key).collect();
        assert_eq!(
            keys,
            vec![(1, Protocol::Tcp, 3), (5432, Protocol::Tcp, 9), (5433, Protocol::Tcp, 9)]
        );
        assert_eq!(entries[1].local_address.as_deref(), Some("127.0.0.1"));

        let mut lookups = processes.lookups.lock().clone();
        lookups.sort_unstable();
        assert_eq!(lookups, vec![3, 9]);
    }

    #[tokio::test]
    async fn test_snapshot_falls_back_to_reported_command() {
        let mut processes = MockProcesses::with(&[(7, "nginx")]);
        processes.nameless.insert(88);
        let (service, _) = service(
            MockSockets::new(vec![
                tcp(5000, Some(88)).with_command("Control\\x20Center"),
                tcp(6000, Some(99)).with_command("ghost"),
                tcp(80, Some(7)).with_command("ignored"),
            ]),
            processes,
        );

        let entries = service.snapshot_ports().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].process_name, "nginx");
        assert_eq!(entries[1].pid, 88);
        assert_eq!(entries[1].process_name, "Control Center");
    }

    #[tokio::test]
    async fn test_snapshot_uses_configured_label() {
        let config = RegistryConfig {
            unknown_process_label: "kernel".to_string(),
            ..Default::default()
        };
        let processes = Arc::new(MockProcesses::default());
        let service = PortRegistryService::with_config(
            MockSockets::new(vec![udp(68, None)]),
            SharedProcesses(Arc::clone(&processes)),
            MockKiller { processes },
            FixedCpu(0.0),
            FixedMemory,
            &config,
        );

        let entries = service.snapshot_ports().await.unwrap();
        assert_eq!(entries[0].process_name, "kernel");
    }

    #[tokio::test]
    async fn test_unreadable_table_is_enumeration_error() {
        let (service, _) = service(MockSockets::unreadable(), MockProcesses::default());
        assert!(matches!(
            service.snapshot_ports().await,
            Err(Error::Enumeration(_))
        ));
    }

    #[tokio::test]
    async fn test_permission_denied_leaves_ports_listed() {
        let mut processes = MockProcesses::with(&[(1000, "sshd")]);
        processes.protected.insert(1000);
        let (service, _) = service(
            MockSockets::new(vec![tcp(22, Some(1000))]),
            processes,
        );

        let result = service.terminate(1000).await;
        assert_eq!(result.outcome, TerminationOutcome::PermissionDenied);

        let entries = service.snapshot_ports().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pid, 1000);
    }

    #[tokio::test]
    async fn test_terminate_then_snapshot() {
        let (service, _) = service(
            MockSockets::new(vec![tcp(3000, Some(1234))]),
            MockProcesses::with(&[(1234, "node")]),
        );

        assert!(service.terminate(1234).await.is_terminated());
        // The stale socket row now points at a dead PID and is dropped.
        assert!(service.snapshot_ports().await.unwrap().is_empty());
        assert_eq!(
            service.terminate(1234).await.outcome,
            TerminationOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_terminate_unknown_pid() {
        let (service, _) = service(MockSockets::new(vec![]), MockProcesses::default());

        let result = service.terminate(9999).await;
        assert_eq!(result, TerminationResult::new(9999, TerminationOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_find_by_pid_and_port() {
        let (service, _) = service(
            MockSockets::new(vec![tcp(8080, Some(1000)), udp(53, Some(1000)), tcp(53, Some(2))]),
            MockProcesses::with(&[(1000, "dnsmasq"), (2, "named")]),
        );

        assert_eq!(service.find_by_pid(1000).await.unwrap().len(), 2);
        assert!(service.find_by_pid(5).await.unwrap().is_empty());

        let on_53 = service.find_by_port(53).await.unwrap();
        assert_eq!(on_53.len(), 2);
        assert_eq!(on_53[0].protocol, Protocol::Tcp);
    }

    #[test]
    fn test_snapshot_telemetry() {
        let (service, _) = service(MockSockets::new(vec![]), MockProcesses::default());
        service.init_telemetry().unwrap();

        let snapshot = service.snapshot_telemetry().unwrap();
        assert_eq!(snapshot.cpu_usage_percent, 25.0);
        assert!(snapshot.memory_used_bytes <= snapshot.memory_total_bytes);
        assert_eq!(snapshot.memory_used_percent(), 25.0);
    }
}
