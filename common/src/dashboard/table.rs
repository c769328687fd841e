//! 教科別得点表の行
//!
//! 表示中かどうかに関係なく、受験した全科目の素点を並べる。

use super::chart::values_by_subject;
use crate::types::{number_value, Exam};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 得点表の1行
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub exam_year: Option<i64>,
    pub values: Vec<(String, Option<f64>)>,
}

impl TableRow {
    pub fn get(&self, subject: &str) -> Option<f64> {
        self.values.iter().find(|(s, _)| s == subject).and_then(|(_, v)| *v)
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 2))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("exam_year", &self.exam_year)?;
        for (subject, value) in &self.values {
            match value {
                Some(v) => map.serialize_entry(subject, &number_value(*v))?,
                None => map.serialize_entry(subject, "")?,
            }
        }
        map.end()
    }
}

/// 得点表の行を作る
pub fn build_table_rows(exams: &[Exam], present_subjects: &[String]) -> Vec<TableRow> {
    exams
        .iter()
        .map(|exam| {
            let scores = values_by_subject(exam, |s| s.score);
            TableRow {
                name: exam.name().to_string(),
                exam_year: exam.exam_year.filter(|y| *y != 0),
                values: present_subjects
                    .iter()
                    .map(|subj| (subj.clone(), scores.get(subj).copied()))
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Score;

    #[test]
    fn test_table_rows() {
        let exams = vec![Exam {
            exam_name: Some("第1回".into()),
            exam_year: Some(2025),
            scores: vec![Score {
                subject_name: Some("英語".into()),
                subject_code: Some(1100.0),
                score: Some(80.0),
                deviation_value: Some(60.0),
            }],
            ..Default::default()
        }];
        let present = vec!["英語".to_string(), "国語".to_string()];
        let rows = build_table_rows(&exams, &present);
        assert_eq!(rows[0].get("英語"), Some(80.0));
        assert_eq!(rows[0].get("国語"), None);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "第1回", "exam_year": 2025, "英語": 80, "国語": ""})
        );
    }

    #[test]
    fn test_missing_year_is_null() {
        let rows = build_table_rows(&[Exam::default()], &[]);
        assert_eq!(rows[0].exam_year, None);
        assert_eq!(rows[0].name, "");
    }
}
