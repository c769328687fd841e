//! 科目モジュール
//!
//! 模試ごとに表記の揺れる科目名を1系列にまとめ、科目コードと表示色を決める。
//!
//! ## 処理フロー
//! 1. 科目名の正規化（`数学I` → `数学①` など）
//! 2. 受験科目の収集と科目コードの確定
//! 3. 系統（科目コードの1000の位）ごとの色割り当て

pub mod normalize;
pub mod collect;
pub mod color;
pub mod full_score;

use crate::types::number_value;
use serde::{Deserialize, Serialize, Serializer};

pub use collect::{collect_subjects_with_code, create_subject_code_map, default_checked_subjects};
pub use color::{assign_subject_colors, subject_color_by_code, FALLBACK_COLOR};
pub use full_score::{full_score_for_common_test, VisibleSubjects};
pub use normalize::normalize_subject_name;

/// 科目コード不明時の値
pub const UNKNOWN_SUBJECT_CODE: f64 = 999_999.0;

/// 合計点系統（デフォルト表示・満点計算で特別扱い）
pub const TOTAL_FAMILY: u32 = 7;

/// 正規化済み科目名と科目コード
///
/// 科目コードは小数のまま保持する（`2500.5` と `2500` は別のコード）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectWithCode {
    pub name: String,
    #[serde(serialize_with = "serialize_code")]
    pub code: f64,
}

impl SubjectWithCode {
    pub fn new(name: impl Into<String>, code: impl Into<f64>) -> Self {
        Self { name: name.into(), code: code.into() }
    }

    pub fn family(&self) -> u32 {
        family_digit(self.code)
    }
}

fn serialize_code<S: Serializer>(code: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    number_value(*code).serialize(serializer)
}

/// 科目コードの1000の位（系統）
pub fn family_digit(code: f64) -> u32 {
    if code.is_finite() && code > 0.0 {
        (code / 1000.0).floor() as u32
    } else {
        0
    }
}

/// 集計から除外する系統（8, 9 は事務用の科目コード）
pub fn is_excluded_family(family: u32) -> bool {
    family == 8 || family == 9
}
