//! 忽略规则与 `.wcignore` 加载（模块）
//!
//! 两种模式：
//! - 以 `/` 开头：去掉前缀后与候选路径做精确比较；
//! - 其他：作为 shell glob，仅与路径最后一段（文件名/目录名）匹配。
//!
//! 按添加顺序依次判断，首个命中即返回。glob 在首次匹配时才编译，结果缓存在规则内。
use std::path::Path;
use std::sync::OnceLock;

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

use crate::error::{Error, Result};

/// 约定的忽略文件名（位于当前工作目录）
pub const IGNORE_FILE_NAME: &str = ".wcignore";

#[derive(Debug)]
enum Rule {
    Exact(String),
    Glob {
        raw: String,
        compiled: OnceLock<std::result::Result<GlobMatcher, globset::Error>>,
    },
}

impl Rule {
    fn parse(pattern: String) -> Self {
        match pattern.strip_prefix('/') {
            Some(exact) => Rule::Exact(exact.to_string()),
            None => Rule::Glob { raw: pattern, compiled: OnceLock::new() },
        }
    }

    fn raw(&self) -> String {
        match self {
            Rule::Exact(p) => format!("/{p}"),
            Rule::Glob { raw, .. } => raw.clone(),
        }
    }

    fn matches(&self, path: &str) -> Result<bool> {
        match self {
            Rule::Exact(p) => Ok(p == path),
            Rule::Glob { raw, compiled } => {
                let compiled = compiled.get_or_init(|| {
                    // `*`/`?` 不跨越分隔符，与单段 glob 语义一致
                    let built = GlobBuilder::new(raw).literal_separator(true).build();
                    if let Err(e) = &built {
                        warn!(
                            pattern = %raw,
                            error = %e,
                            "invalid ignore pattern, treated as non-matching"
                        );
                    }
                    built.map(|g| g.compile_matcher())
                });
                match compiled {
                    Ok(m) => Ok(m.is_match(base_name(path))),
                    Err(e) => Err(Error::pattern_match(raw, e.clone())),
                }
            }
        }
    }
}

/// 有序忽略规则集合
#[derive(Debug, Default)]
pub struct IgnoreMatcher {
    rules: Vec<Rule>,
}

impl IgnoreMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut m = Self::new();
        for p in patterns {
            m.add_pattern(p);
        }
        m
    }

    /// 追加一条规则（不去重、不校验）
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        self.rules.push(Rule::parse(pattern.into()));
    }

    pub fn patterns(&self) -> Vec<String> {
        self.rules.iter().map(Rule::raw).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 静默版本：非法 glob 视为不匹配，继续判断后续规则
    pub fn is_ignored(&self, path: &str) -> bool {
        for rule in &self.rules {
            match rule.matches(path) {
                Ok(true) => return true,
                Ok(false) | Err(_) => {}
            }
        }
        false
    }

    /// 检查版本：遇到非法 glob 立即返回 `PatternMatch` 错误
    pub fn is_ignored_checked(&self, path: &str) -> Result<bool> {
        for rule in &self.rules {
            if rule.matches(path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

/// 读取当前目录下的 `.wcignore`
pub fn discover_ignore_file() -> Vec<String> {
    load_ignore_file(Path::new(IGNORE_FILE_NAME))
}

/// 逐行读取忽略文件：跳过空行与 `#` 注释；文件不存在或不可读时返回空列表
pub fn load_ignore_file(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_ignore_lines(&text),
        Err(_) => Vec::new(),
    }
}

pub fn parse_ignore_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn exact_pattern_requires_full_match() {
        let m = IgnoreMatcher::from_patterns(["/exact.txt"]);
        assert!(m.is_ignored("exact.txt"));
        assert!(!m.is_ignored("prefix-exact.txt"));
        assert!(!m.is_ignored("sub/exact.txt"));
    }

    #[test]
    fn glob_matches_last_segment() {
        let m = IgnoreMatcher::from_patterns(["*.go"]);
        assert!(m.is_ignored("main.go"));
        assert!(m.is_ignored("cmd/app/main.go"));
        assert!(!m.is_ignored("main.gox"));
        assert!(!m.is_ignored("main.go/readme.md"));
    }

    #[test]
    fn question_mark_and_class() {
        let m = IgnoreMatcher::from_patterns(["?.md", "[ab].txt"]);
        assert!(m.is_ignored("x.md"));
        assert!(!m.is_ignored("xy.md"));
        assert!(m.is_ignored("a.txt"));
        assert!(!m.is_ignored("c.txt"));
    }

    #[test]
    fn double_star_degrades_to_last_segment() {
        let m = IgnoreMatcher::from_patterns(["**/*.js"]);
        assert!(m.is_ignored("app.js"));
        assert!(m.is_ignored("src/deep/app.js"));
        assert!(!m.is_ignored("src/app.ts"));
    }

    #[test]
    fn directory_names_match_plain_patterns() {
        let m = IgnoreMatcher::from_patterns([".git", "node_modules"]);
        assert!(m.is_ignored("project/.git"));
        assert!(m.is_ignored("node_modules/"));
        assert!(!m.is_ignored("src"));
    }

    #[test]
    fn invalid_glob_never_matches_silently() {
        let m = IgnoreMatcher::from_patterns(["[", "*.md"]);
        assert!(!m.is_ignored("["));
        assert!(!m.is_ignored("a.txt"));
        // 后续规则仍然生效
        assert!(m.is_ignored("a.md"));
    }

    #[test]
    fn checked_variant_surfaces_compile_error() {
        let m = IgnoreMatcher::from_patterns(["[abc"]);
        let err = m.is_ignored_checked("a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PatternMatch);
        assert_eq!(err.context_value("pattern"), Some("[abc"));

        let ok = IgnoreMatcher::from_patterns(["*.md"]);
        assert!(ok.is_ignored_checked("a.md").unwrap());
        assert!(!ok.is_ignored_checked("a.rs").unwrap());
    }

    #[test]
    fn first_match_wins_in_order() {
        let m = IgnoreMatcher::from_patterns(["*.md", "["]);
        // 第一条已命中，不会走到非法规则
        assert!(m.is_ignored_checked("a.md").unwrap());
    }

    #[test]
    fn add_pattern_keeps_order_and_duplicates() {
        let mut m = IgnoreMatcher::new();
        assert!(m.is_empty());
        m.add_pattern(".git");
        m.add_pattern("/build");
        m.add_pattern(".git");
        assert_eq!(m.patterns(), vec![".git", "/build", ".git"]);
    }

    #[test]
    fn ignore_lines_skip_blank_and_comments() {
        let text = "*.log\n\n# comment\n*.tmp\r\n\n# another\nbuild/\n";
        assert_eq!(parse_ignore_lines(text), vec!["*.log", "*.tmp", "build/"]);
        assert!(parse_ignore_lines("").is_empty());
    }

    #[test]
    fn missing_ignore_file_is_empty() {
        assert!(load_ignore_file(Path::new("definitely/not/here/.wcignore")).is_empty());
    }
}
