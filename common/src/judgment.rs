//! 志望校判定一覧
//!
//! 選択中の模試の判定を志望順位の昇順に並べ、表示用に1から振り直す。

use crate::types::{Exam, Judgement};
use serde::{Deserialize, Serialize};

/// 志望順位がない判定の並び順
const UNRANKED_ORDER: i64 = 999;

/// 判定一覧の1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRow {
    /// 表示用の連番（1始まり）
    pub no: usize,
    pub preference_order: Option<i64>,
    /// 大学名
    pub uni: String,
    /// 学部
    pub dept: String,
    /// 募集区分
    pub recruit: String,
    pub judgment: String,
    pub judgement_kyote: String,
    pub judgement_niji: String,
    pub judgement_sougou: String,
}

/// 並び替え用の志望順位（欠落・0 は最後）
fn sort_order(j: &Judgement) -> i64 {
    match j.preference_order {
        Some(order) if order != 0 => order,
        _ => UNRANKED_ORDER,
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// 模試の判定一覧を作る
pub fn judgment_list(exam: &Exam) -> Vec<JudgmentRow> {
    let mut sorted: Vec<&Judgement> = exam.judgements.iter().collect();
    sorted.sort_by_key(|j| sort_order(j));

    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, j)| JudgmentRow {
            no: idx + 1,
            preference_order: j.preference_order.filter(|o| *o != 0),
            uni: text(&j.university_name),
            dept: text(&j.faculty_name),
            recruit: text(&j.department_name),
            judgment: text(&j.judgement),
            judgement_kyote: text(&j.judgement_kyote),
            judgement_niji: text(&j.judgement_niji),
            judgement_sougou: text(&j.judgement_sougou),
        })
        .collect()
}

/// 判定ランク
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgmentGrade {
    A,
    B,
    C,
    D,
    E,
    Other,
}

impl JudgmentGrade {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "A" => JudgmentGrade::A,
            "B" => JudgmentGrade::B,
            "C" => JudgmentGrade::C,
            "D" => JudgmentGrade::D,
            "E" => JudgmentGrade::E,
            _ => JudgmentGrade::Other,
        }
    }

    /// セル背景色（RGB）
    pub fn fill_color(&self) -> u32 {
        match self {
            JudgmentGrade::A => 0xFEE2E2,
            JudgmentGrade::B => 0xFFEDD5,
            JudgmentGrade::C => 0xECFCCB,
            JudgmentGrade::D => 0xDCFCE7,
            JudgmentGrade::E => 0xDBEAFE,
            JudgmentGrade::Other => 0xF1F5F9,
        }
    }
}
