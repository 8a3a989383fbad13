//! 公共类型（对外暴露）
use serde::Serialize;
use std::fmt;

use crate::stats::Stats;

/// 导出表格中的单元格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(usize),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Count(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Count(n)
    }
}

/// 一行（表头或数据行）
pub type Row = Vec<Cell>;

/// 汇总行的首列标签
pub const TOTAL_LABEL: &str = "Total";
/// 文件列名
pub const FILE_COLUMN: &str = "File";

/// 统计列转为单元格：Lines, ChineseChars, NonChineseChars, TotalChars
pub fn stats_cells(s: &Stats) -> Row {
    vec![
        Cell::Count(s.lines),
        Cell::Count(s.chinese_chars),
        Cell::Count(s.non_chinese_chars),
        Cell::Count(s.total_chars),
    ]
}

/// 带首列标签的行（文件路径或 Total）
pub fn labeled_row(label: impl Into<String>, s: &Stats) -> Row {
    let mut row = vec![Cell::Text(label.into())];
    row.extend(stats_cells(s));
    row
}

/// 带 File 列的表头
pub fn file_header() -> Row {
    std::iter::once(FILE_COLUMN).chain(Stats::COLUMNS).map(Cell::from).collect()
}

/// 不带 File 列的表头
pub fn stats_header() -> Row {
    Stats::COLUMNS.into_iter().map(Cell::from).collect()
}
