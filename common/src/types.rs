//! 模試データの型定義
//!
//! バックエンドが返すJSONをそのまま受ける型:
//! - Exam: 1回分の模試（科目スコアと志望校判定を含む）
//! - Score: 科目ごとの得点・偏差値
//! - Judgement: 志望順位ごとの判定
//! - StudentDetail: 生徒詳細（模試一覧を含む）
//!
//! 数値フィールドは数値・数値文字列・null・欠落のいずれも受け付け、
//! パースできない値は欠落として扱う（エラーにしない）。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 模試1回分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub exam_id: Option<i64>,

    #[serde(default)]
    pub exam_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub exam_year: Option<i64>,

    /// 模試種別（"共テ" / "記述" / "高1/高2" / "OP..." など）
    #[serde(default)]
    pub exam_type: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub scores: Vec<Score>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub judgements: Vec<Judgement>,
}

impl Exam {
    /// 模試名（欠落時は空文字）
    pub fn name(&self) -> &str {
        self.exam_name.as_deref().unwrap_or("")
    }

    /// 模試種別（欠落時は空文字）
    pub fn exam_type(&self) -> &str {
        self.exam_type.as_deref().unwrap_or("")
    }

    /// 志望順位1の判定
    pub fn first_preference(&self) -> Option<&Judgement> {
        self.judgements.iter().find(|j| j.preference_order == Some(1))
    }
}

/// 科目スコア
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub subject_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub subject_code: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub deviation_value: Option<f64>,
}

/// 志望校判定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    /// 志望順位（1 = 第1志望）
    #[serde(default, deserialize_with = "lenient_i64")]
    pub preference_order: Option<i64>,

    #[serde(default)]
    pub university_name: Option<String>,

    #[serde(default)]
    pub faculty_name: Option<String>,

    /// 募集区分
    #[serde(default)]
    pub department_name: Option<String>,

    #[serde(default)]
    pub judgement: Option<String>,

    #[serde(default)]
    pub judgement_kyote: Option<String>,

    #[serde(default)]
    pub judgement_niji: Option<String>,

    #[serde(default)]
    pub judgement_sougou: Option<String>,
}

impl Judgement {
    pub fn university(&self) -> &str {
        self.university_name.as_deref().unwrap_or("")
    }

    pub fn faculty(&self) -> &str {
        self.faculty_name.as_deref().unwrap_or("")
    }

    pub fn department(&self) -> &str {
        self.department_name.as_deref().unwrap_or("")
    }

    /// 総合的な判定（判定 → 総合 → 共テ → 2次 の順で最初の非空値）
    pub fn overall(&self) -> &str {
        [
            &self.judgement,
            &self.judgement_sougou,
            &self.judgement_kyote,
            &self.judgement_niji,
        ]
        .into_iter()
        .filter_map(|j| j.as_deref())
        .find(|j| !j.is_empty())
        .unwrap_or("")
    }
}

/// 生徒詳細
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentDetail {
    #[serde(default)]
    pub student_id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_kana: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub grade: Value,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub admission_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exams: Vec<Exam>,
}

/// 入力ドキュメント（生徒詳細 or 模試配列）
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExamsDocument {
    Exams(Vec<Exam>),
    Student(Box<StudentDetail>),
}

impl ExamsDocument {
    pub fn into_exams(self) -> Vec<Exam> {
        match self {
            ExamsDocument::Exams(exams) => exams,
            ExamsDocument::Student(student) => student.exams,
        }
    }
}

/// JSON値を数値として解釈（数値文字列も可、非有限値は欠落扱い）
pub fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// 整数値であれば整数のJSON数値、そうでなければ浮動小数点で出力
pub fn number_value(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_f64)
        .filter(|v| v.fract() == 0.0)
        .map(|v| v as i64))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
