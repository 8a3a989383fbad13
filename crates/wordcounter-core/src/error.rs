//! 错误类型（模块）
//!
//! 所有对外 API 统一返回 [`Error`]：
//! - `kind` 标识错误类别，便于调用方分支处理；
//! - `message` 为可读描述；
//! - `source` 保留底层原因（io、glob、xlsx 等）；
//! - `context` 记录诊断用的键值对（路径、模式、操作名）。
use std::fmt;
use std::path::Path;

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    FileRead,
    FileWrite,
    InvalidInput,
    InvalidPath,
    PatternMatch,
    Export,
    Server,
    Cancelled,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::FileNotFound => "file not found",
            ErrorKind::FileRead => "file read",
            ErrorKind::FileWrite => "file write",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::InvalidPath => "invalid path",
            ErrorKind::PatternMatch => "pattern match",
            ErrorKind::Export => "export",
            ErrorKind::Server => "server",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 统一错误结构
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxedCause>,
    context: Vec<(String, String)>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), source: None, context: Vec::new() }
    }

    /// 附带底层原因
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// 追加一条上下文（同名键不去重，按追加顺序保留）
    pub fn with_context(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.context.push((key.into(), value.to_string()));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// 按键查找上下文值
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn file_not_found(path: &Path, source: std::io::Error) -> Self {
        let message = format!("file or directory not found: {}", path.display());
        Self::new(ErrorKind::FileNotFound, message)
            .with_source(source)
            .with_context("path", path.display())
    }

    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileRead, format!("failed to read file: {}", path.display()))
            .with_source(source)
            .with_context("path", path.display())
    }

    pub fn file_write(path: &Path, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileWrite, format!("failed to write file: {}", path.display()))
            .with_source(source)
            .with_context("path", path.display())
    }

    /// 读取阶段的 io 错误分类：NotFound 归为 FileNotFound，其余为 FileRead
    pub fn from_read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::file_not_found(path, source)
        } else {
            Self::file_read(path, source)
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn invalid_path(path: &Path, source: std::io::Error) -> Self {
        Self::new(ErrorKind::InvalidPath, format!("invalid path: {}", path.display()))
            .with_source(source)
            .with_context("path", path.display())
    }

    pub fn pattern_match(pattern: &str, source: globset::Error) -> Self {
        Self::new(ErrorKind::PatternMatch, format!("invalid pattern: {pattern}"))
            .with_source(source)
            .with_context("pattern", pattern)
    }

    pub fn export<E>(operation: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(ErrorKind::Export, format!("export failed: {operation}"))
            .with_source(source)
            .with_context("operation", operation)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "scan cancelled")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}
