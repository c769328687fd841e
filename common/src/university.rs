//! 第1志望判定推移
//!
//! 最新の模試で第1志望とした大学・学部・募集区分を基準にし、
//! 同じ志望を第1志望とした模試だけを模試種別ごとに並べる。

use crate::types::{Exam, Judgement};
use regex::Regex;
use serde::Serialize;

/// 第1志望（大学・学部・募集区分）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstPreference {
    pub university_name: String,
    pub faculty_name: String,
    pub department_name: String,
}

impl FirstPreference {
    fn from_judgement(j: &Judgement) -> Self {
        Self {
            university_name: j.university().to_string(),
            faculty_name: j.faculty().to_string(),
            department_name: j.department().to_string(),
        }
    }

    fn matches(&self, j: &Judgement) -> bool {
        j.university() == self.university_name
            && j.faculty() == self.faculty_name
            && j.department() == self.department_name
    }

    /// 表示タイトル（空でない要素を空白区切り）
    pub fn title(&self) -> String {
        [&self.university_name, &self.faculty_name, &self.department_name]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 判定推移の模試区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExamBucket {
    #[serde(rename = "共テ")]
    CommonTest,
    #[serde(rename = "記述")]
    Descriptive,
    #[serde(rename = "高1/高2")]
    HighSchool,
    #[serde(rename = "オープン")]
    Open,
}

impl ExamBucket {
    pub const ALL: [ExamBucket; 4] = [
        ExamBucket::CommonTest,
        ExamBucket::Descriptive,
        ExamBucket::HighSchool,
        ExamBucket::Open,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExamBucket::CommonTest => "共テ",
            ExamBucket::Descriptive => "記述",
            ExamBucket::HighSchool => "高1/高2",
            ExamBucket::Open => "オープン",
        }
    }

    /// 模試種別から区分を判定（どれにも当たらなければ None）
    pub fn classify(exam_type: &str) -> Option<Self> {
        if exam_type.contains('共') {
            Some(ExamBucket::CommonTest)
        } else if exam_type.contains("記述") {
            Some(ExamBucket::Descriptive)
        } else if exam_type.contains("高1") || exam_type.contains("高2") {
            Some(ExamBucket::HighSchool)
        } else if exam_type.contains("OP") || exam_type.contains("オープン") {
            Some(ExamBucket::Open)
        } else {
            None
        }
    }
}

/// 模試名を短縮する（`第N回` / `高N` / そのまま）
pub fn shorten_exam_name(exam_name: &str) -> String {
    lazy_static::lazy_static! {
        static ref ROUND_RE: Regex = Regex::new(r"第(\d+)回").unwrap();
        static ref GRADE_RE: Regex = Regex::new(r"高([12])").unwrap();
    }

    if let Some(caps) = ROUND_RE.captures(exam_name) {
        return format!("第{}回", &caps[1]);
    }
    if let Some(caps) = GRADE_RE.captures(exam_name) {
        return format!("高{}", &caps[1]);
    }
    exam_name.to_string()
}

/// 判定推移の1列（模試1回分）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendColumn {
    pub exam_name: String,
    pub short_name: String,
    pub judgement_kyote: String,
    pub judgement_niji: String,
}

impl TrendColumn {
    /// 表示値（空なら `-`）
    pub fn kyote_display(&self) -> &str {
        display(&self.judgement_kyote)
    }

    pub fn niji_display(&self) -> &str {
        display(&self.judgement_niji)
    }
}

fn display(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

/// 区分ごとの判定推移
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSection {
    pub bucket: ExamBucket,
    pub columns: Vec<TrendColumn>,
}

impl TrendSection {
    /// 共テ判定の行を表示するか（共テ区分のみ）
    pub fn shows_kyote(&self) -> bool {
        self.bucket == ExamBucket::CommonTest
    }
}

/// 第1志望判定推移
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstPreferenceTrend {
    pub anchor: FirstPreference,
    pub title: String,
    pub sections: Vec<TrendSection>,
}

/// 最新の模試の第1志望（志望順位1、なければ先頭の判定）
pub fn anchor_preference(exams: &[Exam]) -> Option<FirstPreference> {
    let latest = exams.last()?;
    latest
        .first_preference()
        .or_else(|| latest.judgements.first())
        .map(FirstPreference::from_judgement)
}

/// 第1志望が基準と一致する模試
pub fn filter_by_first_preference<'a>(exams: &'a [Exam], anchor: &FirstPreference) -> Vec<&'a Exam> {
    exams
        .iter()
        .filter(|ex| ex.first_preference().is_some_and(|j| anchor.matches(j)))
        .collect()
}

fn trend_column(exam: &Exam) -> TrendColumn {
    let first = exam.first_preference();
    let text = |value: Option<&String>| value.cloned().unwrap_or_default();
    TrendColumn {
        exam_name: exam.name().to_string(),
        short_name: shorten_exam_name(exam.name()),
        judgement_kyote: text(first.and_then(|j| j.judgement_kyote.as_ref())),
        judgement_niji: text(first.and_then(|j| j.judgement_niji.as_ref())),
    }
}

/// 第1志望判定推移を作る（データがなければ None）
pub fn first_preference_trend(exams: &[Exam]) -> Option<FirstPreferenceTrend> {
    let anchor = anchor_preference(exams)?;
    let filtered = filter_by_first_preference(exams, &anchor);
    if filtered.is_empty() {
        return None;
    }

    let sections = ExamBucket::ALL
        .iter()
        .filter_map(|&bucket| {
            let columns: Vec<TrendColumn> = filtered
                .iter()
                .filter(|ex| ExamBucket::classify(ex.exam_type()) == Some(bucket))
                .map(|ex| trend_column(ex))
                .collect();
            (!columns.is_empty()).then_some(TrendSection { bucket, columns })
        })
        .collect();

    tracing::debug!(
        matched = filtered.len(),
        total = exams.len(),
        "第1志望が一致する模試を抽出"
    );

    Some(FirstPreferenceTrend {
        title: anchor.title(),
        anchor,
        sections,
    })
}
