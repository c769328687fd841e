//! 共テの満点
//!
//! 系統1,2,4,5,6 は100点、系統3 は200点。系統7（合計）は表示中の
//! 系統7以外の科目の満点合計。

use super::{family_digit, TOTAL_FAMILY, UNKNOWN_SUBJECT_CODE};
use std::collections::HashMap;

/// 合計系統の満点計算に使う表示中科目
#[derive(Debug, Clone, Copy)]
pub struct VisibleSubjects<'a> {
    pub names: &'a [String],
    pub code_map: &'a HashMap<String, f64>,
}

/// 科目コードから満点を求める
pub fn full_score_for_common_test(code: f64, visible: Option<VisibleSubjects<'_>>) -> u32 {
    match family_digit(code) {
        1 | 2 | 4 | 5 | 6 => 100,
        3 => 200,
        TOTAL_FAMILY => match visible {
            Some(v) => v
                .names
                .iter()
                .map(|name| v.code_map.get(name).copied().unwrap_or(UNKNOWN_SUBJECT_CODE))
                .filter(|c| family_digit(*c) != TOTAL_FAMILY)
                .map(|c| full_score_for_common_test(c, Some(v)))
                .sum(),
            None => 100,
        },
        _ => 100,
    }
}
