//! 字符分类（模块）
//!
//! 纯函数：码点 → {中文, 非中文}。热路径上逐码点调用，只做有序区间比较。

/// 字符类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Chinese,
    NonChinese,
}

/// 判定码点是否计为“中文”
///
/// 覆盖区间：
/// - CJK 统一汉字及扩展 A–F
/// - CJK 符号和标点（U+3000–U+303F）
/// - 半角及全角形式（U+FF00–U+FFEF），因此全角逗号、句号、感叹号也计为中文
#[inline]
pub fn is_chinese(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'     // CJK 符号和标点
        | '\u{3400}'..='\u{4DBF}'   // 扩展 A
        | '\u{4E00}'..='\u{9FFF}'   // 基本区
        | '\u{FF00}'..='\u{FFEF}'   // 半角及全角形式
        | '\u{20000}'..='\u{2A6DF}' // 扩展 B
        | '\u{2A700}'..='\u{2B73F}' // 扩展 C
        | '\u{2B740}'..='\u{2B81F}' // 扩展 D
        | '\u{2B820}'..='\u{2CEAF}' // 扩展 E
        | '\u{2CEB0}'..='\u{2EBEF}' // 扩展 F
    )
}

#[inline]
pub fn classify(c: char) -> CharClass {
    if is_chinese(c) {
        CharClass::Chinese
    } else {
        CharClass::NonChinese
    }
}
