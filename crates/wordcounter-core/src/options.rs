//! 统计选项与运行信息（模块）
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// 工作线程数下限默认值
pub const MIN_WORKERS: usize = 1;
/// 工作线程数上限默认值
pub const MAX_WORKERS: usize = 32;

/// 输出路径显示方式
/// - Absolute：绝对路径
/// - Relative：相对扫描根目录（单文件模式下相对当前工作目录）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathDisplay {
    #[default]
    Absolute,
    Relative,
}

/// 工作线程数上下限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerLimits {
    min: usize,
    max: usize,
}

impl WorkerLimits {
    /// 要求 `1 <= min <= max`
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min == 0 || min > max {
            return Err(Error::invalid_input(format!("invalid worker limits: min={min}, max={max}"))
                .with_context("min", min)
                .with_context("max", max));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// 计算实际工作线程数：可用并行度夹在 [min, max] 内，且不超过文件数（至少 1）
    pub fn resolve(&self, available: usize, files: usize) -> usize {
        available.clamp(self.min, self.max).min(files).max(1)
    }
}

impl Default for WorkerLimits {
    fn default() -> Self {
        Self { min: MIN_WORKERS, max: MAX_WORKERS }
    }
}

/// 目录统计选项
#[derive(Debug, Clone, Default)]
pub struct CountOptions {
    /// 线程数：None 表示自动（等于 CPU 核数）
    pub threads: Option<usize>,
    pub limits: WorkerLimits,
    pub path_display: PathDisplay,
    /// 是否追加 Total 汇总行
    pub include_total: bool,
    /// 可选的取消标记；置位后工作线程不再领取新任务
    pub cancel: Option<CancelToken>,
}

impl CountOptions {
    /// 当前机器上的可用并行度
    pub(crate) fn available_parallelism(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// 协作式取消标记（可跨线程克隆）
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 最近一次统计的运行信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunInfo {
    pub files_discovered: usize,
    pub workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_reject_bad_bounds() {
        assert!(WorkerLimits::new(0, 4).is_err());
        assert!(WorkerLimits::new(5, 4).is_err());
        assert!(WorkerLimits::new(2, 2).is_ok());
    }

    #[test]
    fn worker_count_follows_files_and_bounds() {
        let l = WorkerLimits::default();
        assert_eq!(l.resolve(8, 0), 1);
        assert_eq!(l.resolve(8, 1), 1);
        assert_eq!(l.resolve(8, 1000), 8);
        assert_eq!(l.resolve(64, 1000), 32);
        assert_eq!(l.resolve(0, 1000), 1);
        assert_eq!(l.resolve(8, 3), 3);
    }

    #[test]
    fn custom_limits_apply() {
        let l = WorkerLimits::new(4, 6).unwrap();
        assert_eq!(l.resolve(1, 100), 4);
        assert_eq!(l.resolve(16, 100), 6);
        assert_eq!(l.resolve(16, 2), 2);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let t = CancelToken::new();
        let c = t.clone();
        assert!(!c.is_cancelled());
        t.cancel();
        assert!(c.is_cancelled());
    }
}
