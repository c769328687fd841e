//! 成績ダッシュボード
//!
//! 模試種別ごとのタブ（共テ / 記述 / 高1・高2 / オープン）について、
//! グラフ・得点表・判定一覧に渡す行をまとめて作る。
//! すべて模試リストからの純粋な導出で、入力が変われば作り直す。

pub mod chart;
pub mod table;

use crate::judgment::{judgment_list, JudgmentRow};
use crate::subject::{
    assign_subject_colors, collect_subjects_with_code, create_subject_code_map,
    default_checked_subjects, SubjectWithCode,
};
use crate::types::Exam;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

pub use chart::{build_chart_rows, build_score_rate_rows, ChartRow, ScoreRate, ScoreRateRow};
pub use table::{build_table_rows, TableRow};

/// ダッシュボードのタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExamTab {
    #[default]
    CommonTest,
    Descriptive,
    HighSchool,
    Open,
}

impl ExamTab {
    pub const ALL: [ExamTab; 4] = [
        ExamTab::CommonTest,
        ExamTab::Descriptive,
        ExamTab::HighSchool,
        ExamTab::Open,
    ];

    /// タブ名
    pub fn label(&self) -> &'static str {
        match self {
            ExamTab::CommonTest => "共テ",
            ExamTab::Descriptive => "記述",
            ExamTab::HighSchool => "高1/高2",
            ExamTab::Open => "オープン",
        }
    }

    /// 模試種別がこのタブに属するか
    pub fn matches(&self, exam_type: &str) -> bool {
        match self {
            ExamTab::CommonTest => exam_type.contains('共'),
            ExamTab::Descriptive => exam_type.contains("記述"),
            ExamTab::HighSchool => exam_type.contains("高1/高2"),
            ExamTab::Open => exam_type.contains("OP"),
        }
    }

    /// タブに属する模試（元の順序を保つ）
    pub fn filter(&self, exams: &[Exam]) -> Vec<Exam> {
        exams
            .iter()
            .filter(|ex| self.matches(ex.exam_type()))
            .cloned()
            .collect()
    }
}

impl std::str::FromStr for ExamTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "common" | "common-test" | "kyote" | "共テ" => Ok(ExamTab::CommonTest),
            "descriptive" | "kijutsu" | "記述" => Ok(ExamTab::Descriptive),
            "high" | "high1-high2" | "高1/高2" => Ok(ExamTab::HighSchool),
            "open" | "op" | "university" | "オープン" => Ok(ExamTab::Open),
            _ => Err(format!(
                "Unknown tab: {}. Use common, descriptive, high, or open",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExamTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for ExamTab {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// グラフの指標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMetric {
    /// 偏差値
    #[default]
    Deviation,
    /// 得点率（共テ満点基準）
    ScoreRate,
}

impl std::str::FromStr for ChartMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deviation" | "dev" | "偏差値" => Ok(ChartMetric::Deviation),
            "score-rate" | "rate" | "得点率" => Ok(ChartMetric::ScoreRate),
            _ => Err(format!("Unknown metric: {}. Use deviation or score-rate", s)),
        }
    }
}

/// グラフの行（指標ごと）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartRows {
    Deviation(Vec<ChartRow>),
    ScoreRate(Vec<ScoreRateRow>),
}

impl ChartRows {
    pub fn len(&self) -> usize {
        match self {
            ChartRows::Deviation(rows) => rows.len(),
            ChartRows::ScoreRate(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// タブ表示のオプション
#[derive(Debug, Clone, Default)]
pub struct TabOptions {
    pub metric: ChartMetric,
    /// 判定一覧に表示する模試名（省略時は最新の模試）
    pub selected_exam: Option<String>,
    /// デフォルトの代わりに使うチェック状態
    pub checked: Option<BTreeSet<String>>,
    /// 追加でチェックする科目
    pub check: Vec<String>,
    /// チェックを外す科目
    pub uncheck: Vec<String>,
}

/// チェック状態を切り替える
pub fn toggle_subject(checked: &mut BTreeSet<String>, subject: &str, on: bool) {
    if on {
        checked.insert(subject.to_string());
    } else {
        checked.remove(subject);
    }
}

/// 1タブ分の表示データ
#[derive(Debug, Clone, Serialize)]
pub struct TabView {
    pub tab: ExamTab,
    #[serde(skip)]
    pub exams: Vec<Exam>,
    /// 受験科目（科目コード順）
    pub subjects: Vec<SubjectWithCode>,
    pub checked: BTreeSet<String>,
    /// チェックされた科目（受験科目の順）
    pub visible_subjects: Vec<String>,
    pub colors: BTreeMap<String, &'static str>,
    pub chart: ChartRows,
    pub table: Vec<TableRow>,
    pub selected_exam: Option<String>,
    pub judgments: Vec<JudgmentRow>,
}

impl TabView {
    /// 模試リスト全体からタブの表示データを作る
    pub fn build(exams: &[Exam], tab: ExamTab, options: &TabOptions) -> Self {
        let exams = tab.filter(exams);
        let subjects = collect_subjects_with_code(&exams);
        let present: Vec<String> = subjects.iter().map(|s| s.name.clone()).collect();
        let code_map = create_subject_code_map(&subjects);

        let mut checked = options
            .checked
            .clone()
            .unwrap_or_else(|| default_checked_subjects(&subjects));
        for subject in &options.check {
            toggle_subject(&mut checked, subject, true);
        }
        for subject in &options.uncheck {
            toggle_subject(&mut checked, subject, false);
        }

        let visible_subjects: Vec<String> = present
            .iter()
            .filter(|s| checked.contains(*s))
            .cloned()
            .collect();

        let colors = assign_subject_colors(&subjects).into_iter().collect();

        let chart = match options.metric {
            ChartMetric::Deviation => ChartRows::Deviation(build_chart_rows(&exams, &visible_subjects)),
            ChartMetric::ScoreRate => {
                ChartRows::ScoreRate(build_score_rate_rows(&exams, &visible_subjects, &code_map))
            }
        };
        let table = build_table_rows(&exams, &present);

        let selected = select_exam(&exams, options.selected_exam.as_deref());
        let selected_exam = selected.map(|ex| ex.name().to_string());
        let judgments = selected.map(judgment_list).unwrap_or_default();

        tracing::debug!(
            tab = tab.label(),
            exams = exams.len(),
            subjects = subjects.len(),
            visible = visible_subjects.len(),
            "タブ表示データを作成"
        );

        Self {
            tab,
            exams,
            subjects,
            checked,
            visible_subjects,
            colors,
            chart,
            table,
            selected_exam,
            judgments,
        }
    }

    /// 受験科目名（科目コード順）
    pub fn present_subjects(&self) -> Vec<&str> {
        self.subjects.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

/// 判定一覧の対象模試
///
/// 指定がなければ最新（末尾）の模試名を使い、その名前の最初の模試を選ぶ。
/// 名前が空か見つからなければ先頭の模試。
fn select_exam<'a>(exams: &'a [Exam], requested: Option<&str>) -> Option<&'a Exam> {
    let target = requested
        .filter(|name| !name.is_empty())
        .or_else(|| exams.last().map(Exam::name).filter(|name| !name.is_empty()));
    target
        .and_then(|name| exams.iter().find(|ex| ex.name() == name))
        .or_else(|| exams.first())
}
