//! 导出：表格 / CSV / Excel
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use comfy_table::{presets, Cell as TableCell, CellAlignment, Table};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::counter::Counter;
use crate::error::{Error, Result};
use crate::types::{Cell, Row};
use crate::unit::to_absolute_path;

/// Excel 默认输出文件
pub const DEFAULT_EXPORT_PATH: &str = "counter.xlsx";

/// 导出类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportKind {
    #[default]
    Table,
    Csv,
    Excel,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Table, ExportKind::Csv, ExportKind::Excel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Table => "table",
            ExportKind::Csv => "csv",
            ExportKind::Excel => "excel",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ExportKind::ALL.into_iter().find(|k| k.as_str() == s).ok_or_else(|| {
            Error::invalid_input(format!(
                "unsupported export type: {s}, supported types: table, csv, excel"
            ))
                .with_context("export_type", s)
        })
    }
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    /// 需要打印到标准输出的文本
    Text(String),
    /// 已写入的文件
    File(PathBuf),
}

/// 导出配置：类型 + 可选输出路径
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    pub kind: ExportKind,
    pub path: Option<PathBuf>,
}

impl Exporter {
    pub fn new(kind: ExportKind, path: Option<PathBuf>) -> Self {
        Self { kind, path }
    }

    /// 按类型导出已完成统计的 counter
    pub fn export(&self, counter: &Counter) -> Result<ExportOutput> {
        let header = counter.header();
        let rows = counter.rows();
        match self.kind {
            ExportKind::Table => Ok(ExportOutput::Text(render_table(&header, &rows))),
            ExportKind::Csv => {
                export_csv(&header, &rows, self.path.as_deref()).map(ExportOutput::Text)
            }
            ExportKind::Excel => {
                let path = self.path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH));
                export_excel(&header, &rows, &path).map(ExportOutput::File)
            }
        }
    }
}

/// 渲染为 ASCII 表格；数字列右对齐
pub fn render_table(header: &Row, rows: &[Row]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_FULL_CONDENSED);
    table.set_header(header.iter().map(|c| TableCell::new(c)));
    for row in rows {
        table.add_row(row.iter().map(|c| {
            let cell = TableCell::new(c);
            match c {
                Cell::Count(_) => cell.set_alignment(CellAlignment::Right),
                Cell::Text(_) => cell,
            }
        }));
    }
    table.to_string()
}

/// 渲染为 CSV（无末尾换行）
pub fn render_csv(header: &Row, rows: &[Row]) -> String {
    std::iter::once(header)
        .chain(rows)
        .map(|row| row.iter().map(|c| escape_field(&c.to_string())).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 渲染 CSV；给定路径时同时写入文件
pub fn export_csv(header: &Row, rows: &[Row], path: Option<&Path>) -> Result<String> {
    let csv = render_csv(header, rows);
    if let Some(path) = path {
        std::fs::write(path, &csv).map_err(|e| Error::file_write(path, e))?;
        info!(path = %path.display(), "csv exported");
    }
    Ok(csv)
}

/// 写入单工作表的 xlsx，返回最终的绝对路径
pub fn export_excel(header: &Row, rows: &[Row], path: &Path) -> Result<PathBuf> {
    let path = to_absolute_path(path)?;
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (r, row) in std::iter::once(header).chain(rows).enumerate() {
        let r = u32::try_from(r)
            .map_err(|_| Error::invalid_input("too many rows for a worksheet"))?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c)
                .map_err(|_| Error::invalid_input("too many columns for a worksheet"))?;
            let written = match cell {
                Cell::Text(s) => sheet.write_string(r, c, s.as_str()),
                Cell::Count(n) => sheet.write_number(r, c, *n as f64),
            };
            written.map_err(|e| Error::export("Excel export", e))?;
        }
    }

    workbook
        .save(&path)
        .map_err(|e| Error::export("Excel export", e).with_context("path", path.display()))?;
    info!(path = %path.display(), "excel exported");
    Ok(path)
}

/// 含分隔符、引号或换行时加引号并转义
fn escape_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::stats::Stats;
    use crate::types::{file_header, labeled_row};

    fn stats(lines: usize, zh: usize, other: usize) -> Stats {
        Stats { lines, chinese_chars: zh, non_chinese_chars: other, total_chars: zh + other }
    }

    fn sample() -> (Row, Vec<Row>) {
        let rows = vec![
            labeled_row("foo.md", &stats(1, 12, 1)),
            labeled_row("test.md", &stats(2, 5, 0)),
        ];
        (file_header(), rows)
    }

    #[test]
    fn parses_export_kinds() {
        assert_eq!("table".parse::<ExportKind>().unwrap(), ExportKind::Table);
        assert_eq!("csv".parse::<ExportKind>().unwrap(), ExportKind::Csv);
        assert_eq!("excel".parse::<ExportKind>().unwrap(), ExportKind::Excel);
        let err = "pdf".parse::<ExportKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn csv_layout() {
        let (h, rows) = sample();
        assert_eq!(
            render_csv(&h, &rows),
            "File,Lines,ChineseChars,NonChineseChars,TotalChars\nfoo.md,1,12,1,13\ntest.md,2,5,0,5"
        );
    }

    #[test]
    fn csv_quotes_special_fields() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("plain.txt"), "plain.txt");
    }

    #[test]
    fn table_contains_every_cell() {
        let (h, rows) = sample();
        let out = render_table(&h, &rows);
        for needle in ["File", "TotalChars", "foo.md", "test.md", "13"] {
            assert!(out.contains(needle), "missing {needle} in\n{out}");
        }
        assert_eq!(out.lines().filter(|l| l.contains(".md")).count(), 2);
    }

    #[test]
    fn csv_is_written_when_path_given() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("test.csv");
        let (h, rows) = sample();
        let text = export_csv(&h, &rows, Some(&p)).unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), text);
    }

    #[test]
    fn csv_write_failure_is_file_write() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("no/such/dir/test.csv");
        let (h, rows) = sample();
        assert_eq!(export_csv(&h, &rows, Some(&p)).unwrap_err().kind(), ErrorKind::FileWrite);
    }

    #[test]
    fn excel_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("test.xlsx");
        let (h, rows) = sample();
        let written = export_excel(&h, &rows, &p).unwrap();
        assert_eq!(written, p);
        let bytes = std::fs::read(&p).unwrap();
        // xlsx 是 zip 容器
        assert_eq!(&bytes[..2], b"PK");
    }
}
