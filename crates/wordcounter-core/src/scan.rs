//! 目录扫描主流程与并行调度
//!
//! 一次 `count()` 分三个阶段：
//! 1. 发现（单线程）：按文件名顺序深度优先遍历，命中忽略规则的目录整棵剪枝；
//! 2. 分发（并行）：(序号, 路径) 进入任务队列，固定数量的 worker 读取文件并分类；
//! 3. 重组：按序号写回预分配的槽位，输出顺序始终等于发现顺序。
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel as channel;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, ErrorKind, Result};
use crate::ignore::IgnoreMatcher;
use crate::options::{CancelToken, CountOptions, PathDisplay, RunInfo};
use crate::stats::{self, Stats};
use crate::unit::{to_absolute_path, FileUnit};

/// 目录统计流水线
#[derive(Debug)]
pub struct ScanPipeline {
    root: PathBuf,
    ignore: IgnoreMatcher,
    opts: CountOptions,
    units: Vec<FileUnit>,
    last_run: RunInfo,
}

impl ScanPipeline {
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreMatcher, opts: CountOptions) -> Self {
        Self { root: root.into(), ignore, opts, units: Vec::new(), last_run: RunInfo::default() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &CountOptions {
        &self.opts
    }

    pub fn ignore_matcher(&self) -> &IgnoreMatcher {
        &self.ignore
    }

    /// 追加忽略规则，下一次 `count()` 生效
    pub fn ignore(&mut self, pattern: impl Into<String>) {
        self.ignore.add_pattern(pattern);
    }

    pub fn enable_total(&mut self) {
        self.opts.include_total = true;
    }

    /// 按发现顺序排列的文件单元
    pub fn units(&self) -> &[FileUnit] {
        &self.units
    }

    pub fn last_run(&self) -> RunInfo {
        self.last_run
    }

    /// 汇总行；未开启 `include_total` 时为 None
    pub fn total(&self) -> Option<Stats> {
        self.opts
            .include_total
            .then(|| stats::total(self.units.iter().map(|u| &u.stats)))
    }

    /// 执行一次完整统计，结果整体替换 `units`
    ///
    /// 任一文件失败即整体失败：先让所有 worker 退出，再返回首个错误。
    pub fn count(&mut self) -> Result<()> {
        self.units.clear();
        self.last_run = RunInfo::default();

        if self.root.as_os_str().is_empty() {
            return Err(Error::invalid_input("path cannot be empty"));
        }
        let root = to_absolute_path(&self.root)?;
        std::fs::metadata(&root).map_err(|e| Error::from_read(&root, e))?;

        let files = discover(&root, &self.ignore)?;
        let workers = self.opts.limits.resolve(self.opts.available_parallelism(), files.len());
        info!(root = %root.display(), files = files.len(), workers, "scan started");

        self.last_run = RunInfo { files_discovered: files.len(), workers };
        self.units = run_workers(&root, files, workers, &self.opts)?;

        info!(files = self.units.len(), "scan finished");
        Ok(())
    }
}

/// 发现阶段：返回未被忽略的文件路径（发现顺序）
fn discover(root: &Path, ignore: &IgnoreMatcher) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    // 根目录本身不参与忽略判断
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !ignore.is_ignored(&ignore_key(root, e.path())));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !is_countable(&entry) {
            continue;
        }
        debug!(path = %entry.path().display(), "discovered");
        files.push(entry.into_path());
    }
    Ok(files)
}

/// 只统计普通文件与指向普通文件的符号链接
///
/// 指向目录的链接、FIFO、socket、设备文件跳过；断开的链接保留，读取时报错并中止统计。
fn is_countable(entry: &walkdir::DirEntry) -> bool {
    let ft = entry.file_type();
    if ft.is_file() {
        return true;
    }
    if ft.is_dir() {
        return false;
    }
    let countable = ft.is_symlink()
        && std::fs::metadata(entry.path()).map_or(true, |m| m.is_file());
    if !countable {
        debug!(path = %entry.path().display(), "skipped: not a regular file");
    }
    countable
}

/// 忽略判断使用的候选串：相对根目录、以 `/` 分隔
fn ignore_key(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let kind = match err.io_error().map(std::io::Error::kind) {
        Some(std::io::ErrorKind::NotFound) => ErrorKind::FileNotFound,
        _ => ErrorKind::FileRead,
    };
    Error::new(kind, format!("failed to walk directory: {}", path.display()))
        .with_source(err)
        .with_context("path", path.display())
}

type Job = (usize, PathBuf);
type Outcome = (usize, Result<FileUnit>);

/// 分发与重组阶段
fn run_workers(
    root: &Path,
    files: Vec<PathBuf>,
    workers: usize,
    opts: &CountOptions,
) -> Result<Vec<FileUnit>> {
    let n = files.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // 两个队列容量都等于文件数，发送端不会阻塞
    let (job_tx, job_rx) = channel::bounded::<Job>(n);
    for job in files.into_iter().enumerate() {
        let _ = job_tx.send(job);
    }
    drop(job_tx);
    let (res_tx, res_rx) = channel::bounded::<Outcome>(n);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("wordcounter-worker-{i}"))
        .build()
        .map_err(|e| Error::internal("failed to build worker pool").with_source(e))?;

    let abort = AtomicBool::new(false);
    let cancel = opts.cancel.as_ref();
    let display = opts.path_display;
    let mut slots: Vec<Option<FileUnit>> = (0..n).map(|_| None).collect();
    let mut first_err: Option<Error> = None;

    // 当前线程负责接收；in_place_scope 返回前所有 worker 已结束
    pool.in_place_scope(|s| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let res_tx = res_tx.clone();
            let abort = &abort;
            s.spawn(move |_| worker_loop(job_rx, res_tx, abort, cancel, root, display));
        }
        drop(res_tx);

        for (idx, outcome) in res_rx.iter() {
            match outcome {
                Ok(unit) => {
                    debug!(idx, path = %unit.display_path, "file counted");
                    slots[idx] = Some(unit);
                }
                Err(e) => {
                    if first_err.is_none() {
                        abort.store(true, Ordering::SeqCst);
                        first_err = Some(e);
                    }
                }
            }
        }
    });

    if let Some(e) = first_err {
        return Err(e);
    }
    match slots.into_iter().collect::<Option<Vec<_>>>() {
        Some(units) => Ok(units),
        None if cancel.is_some_and(CancelToken::is_cancelled) => Err(Error::cancelled()),
        None => Err(Error::internal("worker pool finished with missing results")),
    }
}

fn worker_loop(
    jobs: channel::Receiver<Job>,
    results: channel::Sender<Outcome>,
    abort: &AtomicBool,
    cancel: Option<&CancelToken>,
    root: &Path,
    display: PathDisplay,
) {
    for (idx, path) in jobs.iter() {
        if abort.load(Ordering::SeqCst) || cancel.is_some_and(CancelToken::is_cancelled) {
            break;
        }
        let outcome = FileUnit::count(&path, root, display);
        if results.send((idx, outcome)).is_err() {
            break;
        }
    }
}
