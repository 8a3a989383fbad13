//! 统计结果与汇总（模块）
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// 单次分类的统计结果
///
/// 不变量：`total_chars == chinese_chars + non_chinese_chars`；
/// 换行符只计入行数，不计入任何字符计数。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stats {
    pub lines: usize,
    pub chinese_chars: usize,
    pub non_chinese_chars: usize,
    pub total_chars: usize,
}

impl Stats {
    /// 表头中的统计列名（不含 File 列）
    pub const COLUMNS: [&'static str; 4] =
        ["Lines", "ChineseChars", "NonChineseChars", "TotalChars"];

    pub fn is_empty(&self) -> bool {
        *self == Stats::default()
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.lines += rhs.lines;
        self.chinese_chars += rhs.chinese_chars;
        self.non_chinese_chars += rhs.non_chinese_chars;
        self.total_chars += rhs.total_chars;
    }
}

impl<'a> std::iter::Sum<&'a Stats> for Stats {
    fn sum<I: Iterator<Item = &'a Stats>>(iter: I) -> Self {
        iter.fold(Stats::default(), |mut acc, s| {
            acc += *s;
            acc
        })
    }
}

/// 汇总：对所有统计逐字段求和（不修改输入）
pub fn total<'a, I>(stats: I) -> Stats
where
    I: IntoIterator<Item = &'a Stats>,
{
    stats.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(lines: usize, zh: usize, other: usize) -> Stats {
        Stats { lines, chinese_chars: zh, non_chinese_chars: other, total_chars: zh + other }
    }

    #[test]
    fn total_sums_every_field() {
        let all = [s(1, 12, 1), s(2, 5, 0)];
        let expected = Stats { lines: 3, chinese_chars: 17, non_chinese_chars: 1, total_chars: 18 };
        assert_eq!(total(&all), expected);
    }

    #[test]
    fn total_of_nothing_is_zero() {
        let none: [Stats; 0] = [];
        assert!(total(&none).is_empty());
    }

    #[test]
    fn serializes_with_exported_field_names() {
        let v = serde_json::to_value(s(2, 12, 0)).unwrap();
        let expected = serde_json::json!({
            "Lines": 2,
            "ChineseChars": 12,
            "NonChineseChars": 0,
            "TotalChars": 12
        });
        assert_eq!(v, expected);
    }
}
