//! 文件单元：路径 + 统计结果
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::options::PathDisplay;
use crate::scanner::scan;
use crate::stats::Stats;

/// 单个文件的统计结果（由处理它的工作线程写入一次，此后只读）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUnit {
    pub path: PathBuf,
    pub display_path: String,
    pub stats: Stats,
}

impl FileUnit {
    /// 读取并统计单个文件
    /// - `base`：相对显示时的基准目录
    pub fn count(path: &Path, base: &Path, display: PathDisplay) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::from_read(path, e))?;
        let stats = scan(&bytes);
        let shown = display_path(path, base, display);
        Ok(Self { path: path.to_path_buf(), display_path: shown, stats })
    }
}

/// 生成显示路径；无法相对化时退回原路径
pub fn display_path(path: &Path, base: &Path, display: PathDisplay) -> String {
    match display {
        PathDisplay::Absolute => path.display().to_string(),
        PathDisplay::Relative => match path.strip_prefix(base) {
            Ok(rel) if rel.as_os_str().is_empty() => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Ok(rel) => rel.display().to_string(),
            Err(_) => path.display().to_string(),
        },
    }
}

/// 相对路径按当前工作目录补全为绝对路径（不解析符号链接）；空路径原样返回
pub fn to_absolute_path(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path).map_err(|e| Error::invalid_path(path, e))
}
