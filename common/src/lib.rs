//! Grades Dashboard Common Library
//!
//! CLIで使う模試成績の型と、ダッシュボード表示データの導出処理

pub mod types;
pub mod error;
pub mod subject;
pub mod judgment;
pub mod dashboard;
pub mod university;
pub mod auth;
pub mod snapshot;
pub mod report;
pub mod export;

pub use types::{Exam, ExamsDocument, Judgement, Score, StudentDetail};
pub use error::{Error, Result};
pub use subject::{
    assign_subject_colors, collect_subjects_with_code, create_subject_code_map,
    default_checked_subjects, full_score_for_common_test, normalize_subject_name,
    subject_color_by_code, SubjectWithCode, VisibleSubjects,
};
pub use judgment::{judgment_list, JudgmentGrade, JudgmentRow};
pub use dashboard::{
    build_chart_rows, build_score_rate_rows, build_table_rows, ChartMetric, ExamTab, TabOptions,
    TabView,
};
pub use university::{filter_by_first_preference, first_preference_trend, FirstPreference, FirstPreferenceTrend};
pub use auth::{guard, AuthError, Route, Session, SessionContext, User};
pub use snapshot::{ExamSnapshot, Memo};
pub use report::DashboardReport;
