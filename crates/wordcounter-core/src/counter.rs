//! 统计器：原始文本 / 单文件 / 目录
//!
//! 三种统计器共享同一契约：`count()` 执行统计，`header()`/`rows()` 供导出使用。
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ignore::IgnoreMatcher;
use crate::options::{CountOptions, PathDisplay};
use crate::scan::ScanPipeline;
use crate::scanner::count_text;
use crate::stats::Stats;
use crate::types::{file_header, labeled_row, stats_cells, stats_header, Row, TOTAL_LABEL};
use crate::unit::{to_absolute_path, FileUnit};

/// 原始字符串统计（不涉及文件与忽略规则）
#[derive(Debug, Clone, Default)]
pub struct TextCounter {
    content: String,
    stats: Stats,
}

impl TextCounter {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), stats: Stats::default() }
    }

    /// 空字符串返回 `InvalidInput`
    pub fn count(&mut self) -> Result<()> {
        self.stats = count_text(&self.content)?;
        Ok(())
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn header(&self) -> Row {
        stats_header()
    }

    pub fn rows(&self) -> Vec<Row> {
        vec![stats_cells(&self.stats)]
    }
}

/// 单文件统计
#[derive(Debug, Clone)]
pub struct FileCounter {
    path: PathBuf,
    display: PathDisplay,
    unit: Option<FileUnit>,
}

impl FileCounter {
    pub fn new(path: impl Into<PathBuf>, display: PathDisplay) -> Self {
        Self { path: path.into(), display, unit: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn count(&mut self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::invalid_input("path cannot be empty"));
        }
        let abs = to_absolute_path(&self.path)?;
        let cwd = std::env::current_dir().map_err(|e| Error::invalid_path(Path::new("."), e))?;
        self.unit = Some(FileUnit::count(&abs, &cwd, self.display)?);
        Ok(())
    }

    pub fn unit(&self) -> Option<&FileUnit> {
        self.unit.as_ref()
    }

    pub fn header(&self) -> Row {
        file_header()
    }

    /// 未统计时为空
    pub fn rows(&self) -> Vec<Row> {
        self.unit
            .iter()
            .map(|u| labeled_row(u.display_path.clone(), &u.stats))
            .collect()
    }
}

/// 目录统计（包装扫描流水线）
#[derive(Debug)]
pub struct DirCounter {
    pipeline: ScanPipeline,
}

impl DirCounter {
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreMatcher, opts: CountOptions) -> Self {
        Self { pipeline: ScanPipeline::new(root, ignore, opts) }
    }

    pub fn pipeline(&self) -> &ScanPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut ScanPipeline {
        &mut self.pipeline
    }

    pub fn count(&mut self) -> Result<()> {
        self.pipeline.count()
    }

    pub fn header(&self) -> Row {
        file_header()
    }

    /// 数据行按发现顺序；开启汇总时末尾追加 Total 行
    pub fn rows(&self) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .pipeline
            .units()
            .iter()
            .map(|u| labeled_row(u.display_path.clone(), &u.stats))
            .collect();
        if let Some(total) = self.pipeline.total() {
            rows.push(labeled_row(TOTAL_LABEL, &total));
        }
        rows
    }
}

/// 统计器的封闭集合
#[derive(Debug)]
pub enum Counter {
    Text(TextCounter),
    File(FileCounter),
    Dir(DirCounter),
}

impl Counter {
    pub fn count(&mut self) -> Result<()> {
        match self {
            Counter::Text(c) => c.count(),
            Counter::File(c) => c.count(),
            Counter::Dir(c) => c.count(),
        }
    }

    pub fn header(&self) -> Row {
        match self {
            Counter::Text(c) => c.header(),
            Counter::File(c) => c.header(),
            Counter::Dir(c) => c.header(),
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        match self {
            Counter::Text(c) => c.rows(),
            Counter::File(c) => c.rows(),
            Counter::Dir(c) => c.rows(),
        }
    }

    /// 表头在前，数据行在后
    pub fn header_and_rows(&self) -> Vec<Row> {
        let mut all = vec![self.header()];
        all.extend(self.rows());
        all
    }
}
