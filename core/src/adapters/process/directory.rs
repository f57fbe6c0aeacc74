//! Process directory backed by sysinfo.

use std::collections::HashMap;

use parking_lot::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};

use crate::domain::display_name;
use crate::ports::ProcessDirectory;

/// Resolves PIDs through a persistent `sysinfo::System`.
///
/// Only the requested PIDs are refreshed, never the whole process table.
pub struct SysinfoDirectory {
    system: Mutex<System>,
}

impl SysinfoDirectory {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::new().with_cmd(UpdateKind::OnlyIfNotSet)
    }
}

impl Default for SysinfoDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// A live, whole process. Threads are rejected: signalling a thread ID
/// takes down its entire process.
fn is_live(process: &sysinfo::Process) -> bool {
    !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
        && process.thread_kind().is_none()
        && is_thread_group_leader(process.pid().as_u32())
}

/// `/proc/<tid>` exists for every thread, so sysinfo happily loads a thread
/// ID as if it were a process. Only a thread group leader is a process.
#[cfg(target_os = "linux")]
fn is_thread_group_leader(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    procfs::process::Process::new(raw)
        .and_then(|p| p.status())
        .map(|status| status.tgid == raw)
        .unwrap_or(true)
}

#[cfg(not(target_os = "linux"))]
fn is_thread_group_leader(_pid: u32) -> bool {
    true
}

fn process_display_name(process: &sysinfo::Process) -> String {
    let name = process.name().to_string_lossy();
    let args: Vec<String> = process
        .cmd()
        .iter()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    display_name(&name, &args)
}

impl ProcessDirectory for SysinfoDirectory {
    fn resolve_name(&self, pid: u32) -> Option<String> {
        self.resolve_names(&[pid]).remove(&pid)
    }

    fn exists(&self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        let mut sys = self.system.lock();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new(),
        );
        sys.process(pid).is_some_and(is_live)
    }

    fn resolve_names(&self, pids: &[u32]) -> HashMap<u32, String> {
        if pids.is_empty() {
            return HashMap::new();
        }

        let wanted: Vec<Pid> = pids.iter().map(|&p| Pid::from_u32(p)).collect();
        let mut sys = self.system.lock();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&wanted),
            true,
            Self::refresh_kind(),
        );

        wanted
            .iter()
            .filter_map(|pid| {
                let process = sys.process(*pid).filter(|p| is_live(p))?;
                Some((pid.as_u32(), process_display_name(process)))
            })
            .collect()
    }
}
