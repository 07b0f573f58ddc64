use std::borrow::Cow;
use std::path::Path;

use sysinfo::{
    CpuRefreshKind, Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate,
    RefreshKind, System, UpdateKind,
};

use crate::error::SampleError;
use crate::models::{Metrics, ProcessHandle};

/// 进程查找与采样
///
/// 引擎只通过这个 trait 访问操作系统，测试里可替换成脚本化的实现
pub trait ProcessLocator: Send {
    /// 在进程表中找第一个名字与 `name` 完全相同（区分大小写）的进程
    ///
    /// 有多个同名进程时返回哪一个取决于操作系统的枚举顺序，不保证稳定
    fn find(&mut self, name: &str) -> Option<ProcessHandle>;

    /// 句柄是否仍指向同一个正在运行的进程；进程不存在只返回 false，不报错
    fn is_alive(&mut self, handle: &ProcessHandle) -> bool;

    /// 读取 CPU 与内存。CPU 是增量值，需要按固定间隔调用
    fn sample(&mut self, handle: &ProcessHandle) -> Result<Metrics, SampleError>;
}

/// 基于 sysinfo 的实现
///
/// `sampler` 只在 find/sample 时刷新，保证两次 CPU 读数的间隔就是采样间隔；
/// 存活检查使用单独的 `liveness`，不干扰 CPU 增量
pub struct SysinfoLocator {
    sampler: System,
    liveness: System,
    logical_cores: usize,
}

impl SysinfoLocator {
    pub fn new() -> Self {
        let cpus = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
        );
        let logical_cores = cpus.cpus().len().max(1);
        log::debug!("SysinfoLocator using {} logical cores", logical_cores);

        Self {
            sampler: System::new(),
            liveness: System::new(),
            logical_cores,
        }
    }

    pub fn logical_cores(&self) -> usize {
        self.logical_cores
    }
}

impl Default for SysinfoLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// 僵尸进程和已退出的进程不算存活
fn is_running_status(status: ProcessStatus) -> bool {
    !matches!(status, ProcessStatus::Zombie | ProcessStatus::Dead)
}

/// Linux 内核 comm 字段的最大长度，超过的进程名会被截断
const COMM_LEN: usize = 15;

/// exe / cmd 只需读取一次，用于还原被截断的进程名
fn name_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_exe(UpdateKind::OnlyIfNotSet)
        .with_cmd(UpdateKind::OnlyIfNotSet)
}

/// 完整进程名
///
/// `name()` 达到 comm 长度上限时，取 cmd[0] 或 exe 的文件名中以它为前缀的那个；
/// 都读不到（例如没有权限）时退回 comm
fn full_name(process: &Process) -> Cow<'_, str> {
    let comm = process.name().to_string_lossy();
    if comm.len() < COMM_LEN {
        return comm;
    }

    let from_cmd = process.cmd().first().map(|arg0| Path::new(arg0));
    let from_exe = process.exe();

    from_cmd
        .into_iter()
        .chain(from_exe)
        .filter_map(|path| path.file_name())
        .map(|base| base.to_string_lossy())
        .find(|base| base.len() > comm.len() && base.starts_with(&*comm))
        .unwrap_or(comm)
}

/// Linux 上线程也会出现在进程表里，只匹配真正的进程
fn is_candidate(process: &Process, name: &str) -> bool {
    process.thread_kind().is_none()
        && full_name(process) == name
        && is_running_status(process.status())
}

impl ProcessLocator for SysinfoLocator {
    fn find(&mut self, name: &str) -> Option<ProcessHandle> {
        // 顺带刷新 CPU，作为下一次 sample 的基准
        self.sampler.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            name_refresh_kind().with_cpu().with_memory(),
        );

        let (pid, process) = self
            .sampler
            .processes()
            .iter()
            .find(|(_, p)| is_candidate(p, name))?;

        log::debug!("Found process '{}': PID {}", name, pid);

        Some(ProcessHandle {
            pid: pid.as_u32(),
            start_time: process.start_time(),
            name: name.to_string(),
        })
    }

    fn is_alive(&mut self, handle: &ProcessHandle) -> bool {
        let pid = Pid::from_u32(handle.pid);
        self.liveness.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            name_refresh_kind(),
        );

        match self.liveness.process(pid) {
            // pid 被复用时启动时间或名字会不一致
            Some(p) => {
                p.start_time() == handle.start_time
                    && full_name(p) == handle.name.as_str()
                    && is_running_status(p.status())
            }
            None => false,
        }
    }

    fn sample(&mut self, handle: &ProcessHandle) -> Result<Metrics, SampleError> {
        let pid = Pid::from_u32(handle.pid);
        self.sampler.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let process = self.sampler.process(pid).ok_or(SampleError::Gone)?;
        if process.start_time() != handle.start_time || !is_running_status(process.status()) {
            return Err(SampleError::Gone);
        }

        Ok(Metrics::from_raw(
            process.cpu_usage(),
            self.logical_cores,
            process.memory(),
        ))
    }
}
