//! 科目名の正規化
//!
//! - 空白除去、`+` → `＋`
//! - `英語+L` → `英語＋Ｌ`、`情報I` → `情報Ⅰ`
//! - 数学の段階表記を丸数字に統一（`数学II` / `数学Ⅱ` / `数学2` → `数学②`）
//! - 複合表記 `数学I・II` など → `数学①②`

use regex::Regex;

/// 科目名を正規化する
///
/// 空・欠落は空文字を返す。正規化済みの名前を再度渡しても結果は変わらない。
pub fn normalize_subject_name(raw: Option<&str>) -> String {
    lazy_static::lazy_static! {
        static ref ENGLISH_LISTENING: Regex = Regex::new(r"^英語[＋+]?(?i:L)$").unwrap();
        static ref INFORMATION_1: Regex = Regex::new(r"情報(?i:I)$").unwrap();
        static ref MATH_3: Regex = Regex::new(r"数学(?:(?i:III)|Ⅲ|3)$").unwrap();
        static ref MATH_2: Regex = Regex::new(r"数学(?:(?i:II)|Ⅱ|2)$").unwrap();
        static ref MATH_1: Regex = Regex::new(r"数学(?:(?i:I)|Ⅰ|1)$").unwrap();
        static ref MATH_1_2: Regex =
            Regex::new(r"数学(?:(?i:I)[・\s]*(?i:II)|Ⅰ[・\s]*Ⅱ|1[・\s]*2|①[・\s]*②)$").unwrap();
    }

    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return String::new(),
    };

    let mut s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '+' { '＋' } else { c })
        .collect();

    s = ENGLISH_LISTENING.replace(&s, "英語＋Ｌ").into_owned();
    s = INFORMATION_1.replace(&s, "情報Ⅰ").into_owned();

    // Ⅲ → Ⅱ → Ⅰ の順に判定する
    s = MATH_3.replace(&s, "数学③").into_owned();
    s = MATH_2.replace(&s, "数学②").into_owned();
    s = MATH_1.replace(&s, "数学①").into_owned();

    MATH_1_2.replace(&s, "数学①②").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> String {
        normalize_subject_name(Some(s))
    }

    #[test]
    fn test_math_levels() {
        assert_eq!(n("数学I"), "数学①");
        assert_eq!(n("数学II"), "数学②");
        assert_eq!(n("数学III"), "数学③");
        assert_eq!(n("数学Ⅰ"), "数学①");
        assert_eq!(n("数学Ⅱ"), "数学②");
        assert_eq!(n("数学Ⅲ"), "数学③");
        assert_eq!(n("数学1"), "数学①");
        assert_eq!(n("数学2"), "数学②");
        assert_eq!(n("数学3"), "数学③");
        assert_eq!(n("数学ii"), "数学②");
    }

    #[test]
    fn test_math_compound() {
        assert_eq!(n("数学I・II"), "数学①②");
        assert_eq!(n("数学Ⅰ・Ⅱ"), "数学①②");
        assert_eq!(n("数学1・2"), "数学①②");
        assert_eq!(n("数学①・②"), "数学①②");
        assert_eq!(n("数学Ⅰ ・ Ⅱ"), "数学①②");
    }

    #[test]
    fn test_english_and_information() {
        assert_eq!(n("英語+L"), "英語＋Ｌ");
        assert_eq!(n("英語＋L"), "英語＋Ｌ");
        assert_eq!(n("英語+l"), "英語＋Ｌ");
        assert_eq!(n("英語L"), "英語＋Ｌ");
        assert_eq!(n("情報I"), "情報Ⅰ");
        assert_eq!(n("情報i"), "情報Ⅰ");
    }

    #[test]
    fn test_whitespace_and_plus() {
        assert_eq!(n(" 英語 R "), "英語R");
        assert_eq!(n("物理　基礎"), "物理基礎");
        assert_eq!(n("英語R+L"), "英語R＋L");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_subject_name(None), "");
        assert_eq!(n(""), "");
        assert_eq!(n("   "), "");
    }

    #[test]
    fn test_unrelated_names_untouched() {
        assert_eq!(n("国語"), "国語");
        assert_eq!(n("総合"), "総合");
        assert_eq!(n("数学①②"), "数学①②");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "数学I", "数学II", "数学III", "数学Ⅰ・Ⅱ", "数学1・2", "数学①・②", "英語+L", "英語＋Ｌ",
            "情報I", "情報Ⅰ", "国語", " 物理 基礎 ", "英語R+L", "数学12", "", "数学ⅰ",
        ];
        for s in samples {
            let once = n(s);
            assert_eq!(n(&once), once, "再正規化で変化: {}", s);
        }
    }
}
