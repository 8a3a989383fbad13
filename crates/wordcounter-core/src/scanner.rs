//! 单遍 UTF-8 扫描器
use crate::classify::is_chinese;
use crate::error::{Error, Result};
use crate::stats::Stats;

/// 对字节缓冲执行一次前向扫描，得到统计结果
///
/// - 空输入返回全零；
/// - `\n` 只增加行数；
/// - 非法 UTF-8 字节逐字节计为一个非中文字符（与逐步解码得到替换字符的语义一致）；
/// - 末行未以 `\n` 结尾时额外计一行。
pub fn scan(bytes: &[u8]) -> Stats {
    let mut stats = Stats::default();
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                scan_str_into(text, &mut stats);
                break;
            }
            Err(e) => {
                let (valid, tail) = rest.split_at(e.valid_up_to());
                // valid_up_to 之前的部分已验证为合法 UTF-8
                if let Ok(text) = std::str::from_utf8(valid) {
                    scan_str_into(text, &mut stats);
                }
                let bad = e.error_len().unwrap_or(tail.len());
                stats.non_chinese_chars += bad;
                stats.total_chars += bad;
                rest = &tail[bad..];
            }
        }
    }

    if bytes.last().is_some_and(|&b| b != b'\n') {
        stats.lines += 1;
    }
    stats
}

/// 字符串版本，语义与 [`scan`] 相同
pub fn scan_str(text: &str) -> Stats {
    scan(text.as_bytes())
}

/// 带输入校验的版本：空内容返回 `InvalidInput`
pub fn count_text(text: &str) -> Result<Stats> {
    if text.is_empty() {
        return Err(Error::invalid_input("input string cannot be empty"));
    }
    Ok(scan_str(text))
}

#[inline]
fn scan_str_into(text: &str, stats: &mut Stats) {
    for c in text.chars() {
        if c == '\n' {
            stats.lines += 1;
            continue;
        }
        if is_chinese(c) {
            stats.chinese_chars += 1;
        } else {
            stats.non_chinese_chars += 1;
        }
        stats.total_chars += 1;
    }
}
