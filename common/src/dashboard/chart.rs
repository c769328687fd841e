//! グラフ用の行
//!
//! 模試1回ごとに `{ name, [科目]: 値 }` を作る。値のない科目は null
//! （グラフ側では線をつなぎ、点は打たない）。

use crate::subject::{family_digit, full_score_for_common_test, is_excluded_family, normalize_subject_name, VisibleSubjects};
use crate::subject::collect::subject_code_of;
use crate::types::{number_value, Exam, Score};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// 偏差値グラフの1行
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub name: String,
    /// 表示中の科目順の値
    pub values: Vec<(String, Option<f64>)>,
}

impl ChartRow {
    pub fn get(&self, subject: &str) -> Option<f64> {
        self.values.iter().find(|(s, _)| s == subject).and_then(|(_, v)| *v)
    }
}

impl Serialize for ChartRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for (subject, value) in &self.values {
            map.serialize_entry(subject, &value.map(number_value))?;
        }
        map.end()
    }
}

/// 得点率
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRate {
    /// 得点 / 満点 * 100
    pub rate: f64,
    /// 素点
    pub original: f64,
}

/// 得点率グラフの1行
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRateRow {
    pub name: String,
    pub values: Vec<(String, Option<ScoreRate>)>,
}

impl ScoreRateRow {
    pub fn get(&self, subject: &str) -> Option<ScoreRate> {
        self.values.iter().find(|(s, _)| s == subject).and_then(|(_, v)| *v)
    }
}

impl Serialize for ScoreRateRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        for (subject, value) in &self.values {
            match value {
                Some(v) => {
                    map.serialize_entry(subject, &number_value(v.rate))?;
                    map.serialize_entry(&format!("{}_original", subject), &number_value(v.original))?;
                }
                None => map.serialize_entry(subject, &Option::<f64>::None)?,
            }
        }
        map.end()
    }
}

/// 模試内の科目ごとの値（同じ科目が複数あれば後勝ち）
pub(crate) fn values_by_subject<F>(exam: &Exam, pick: F) -> HashMap<String, f64>
where
    F: Fn(&Score) -> Option<f64>,
{
    let mut values = HashMap::new();
    for score in &exam.scores {
        if is_excluded_family(family_digit(subject_code_of(score))) {
            continue;
        }
        let canon = normalize_subject_name(score.subject_name.as_deref());
        if canon.is_empty() {
            continue;
        }
        if let Some(v) = pick(score) {
            values.insert(canon, v);
        }
    }
    values
}

/// 偏差値の行を作る
pub fn build_chart_rows(exams: &[Exam], visible_subjects: &[String]) -> Vec<ChartRow> {
    exams
        .iter()
        .map(|exam| {
            let deviations = values_by_subject(exam, |s| s.deviation_value);
            ChartRow {
                name: exam.name().to_string(),
                values: visible_subjects
                    .iter()
                    .map(|subj| (subj.clone(), deviations.get(subj).copied()))
                    .collect(),
            }
        })
        .collect()
}

/// 得点率の行を作る
///
/// 満点が0になる科目（表示中に系統7以外の科目がない合計点など）は値なし。
pub fn build_score_rate_rows(
    exams: &[Exam],
    visible_subjects: &[String],
    code_map: &HashMap<String, f64>,
) -> Vec<ScoreRateRow> {
    let visible = VisibleSubjects { names: visible_subjects, code_map };
    let full_scores: HashMap<&str, u32> = visible_subjects
        .iter()
        .map(|subj| {
            let code = code_map.get(subj).copied().unwrap_or(crate::subject::UNKNOWN_SUBJECT_CODE);
            (subj.as_str(), full_score_for_common_test(code, Some(visible)))
        })
        .collect();

    exams
        .iter()
        .map(|exam| {
            let scores = values_by_subject(exam, |s| s.score);
            ScoreRateRow {
                name: exam.name().to_string(),
                values: visible_subjects
                    .iter()
                    .map(|subj| {
                        let full = full_scores.get(subj.as_str()).copied().unwrap_or(0);
                        let rate = scores
                            .get(subj)
                            .filter(|_| full > 0)
                            .map(|&original| ScoreRate {
                                rate: original * 100.0 / full as f64,
                                original,
                            });
                        (subj.clone(), rate)
                    })
                    .collect(),
            }
        })
        .collect()
}
