//! 中文字符统计核心库
//!
//! 设计要点：
//! - 逐字符单遍扫描，统计行数、中文字符、非中文字符与总字符数；非法 UTF-8 字节按非中文计。
//! - 目录模式：单线程按文件名顺序发现，固定数量 worker 并行统计，按发现顺序重组输出。
//! - 忽略规则：`/` 开头为相对扫描根目录的精确匹配，其余为 glob，匹配文件/目录名。
//! - 任一文件失败即整体失败，所有 worker 退出后再返回首个错误。

mod classify;
mod counter;
mod error;
mod export;
mod ignore;
mod options;
mod scan;
mod scanner;
mod server;
mod stats;
mod types;
mod unit;

pub use classify::{classify, is_chinese, CharClass};
pub use counter::{Counter, DirCounter, FileCounter, TextCounter};
pub use error::{Error, ErrorKind, Result};
pub use export::{
    export_csv, export_excel, render_csv, render_table, ExportKind, ExportOutput, Exporter,
    DEFAULT_EXPORT_PATH,
};
pub use ignore::{
    discover_ignore_file, load_ignore_file, parse_ignore_lines, IgnoreMatcher, IGNORE_FILE_NAME,
};
pub use options::{
    CancelToken, CountOptions, PathDisplay, RunInfo, WorkerLimits, MAX_WORKERS, MIN_WORKERS,
};
pub use scan::ScanPipeline;
pub use scanner::{count_text, scan, scan_str};
pub use server::{
    handle, handle_count, Response, Server, COUNT_ENDPOINT, DEFAULT_HOST, DEFAULT_PORT,
    PING_ENDPOINT,
};
pub use stats::{total, Stats};
pub use types::{Cell, Row, FILE_COLUMN, TOTAL_LABEL};
pub use unit::{display_path, to_absolute_path, FileUnit};
