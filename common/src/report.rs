//! 成績レポート
//!
//! 4タブ分の表示データと第1志望判定推移をまとめる。

use crate::dashboard::{ExamTab, TabOptions, TabView};
use crate::types::Exam;
use crate::university::{first_preference_trend, FirstPreferenceTrend};
use serde::Serialize;

/// 成績レポート全体
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub title: String,
    /// 模試のあるタブのみ
    pub tabs: Vec<TabView>,
    pub first_preference: Option<FirstPreferenceTrend>,
}

impl DashboardReport {
    pub fn build(exams: &[Exam], title: &str, options: &TabOptions) -> Self {
        let tabs = ExamTab::ALL
            .iter()
            .map(|&tab| TabView::build(exams, tab, options))
            .filter(|view| !view.is_empty())
            .collect();

        Self {
            title: title.to_string(),
            tabs,
            first_preference: first_preference_trend(exams),
        }
    }

    pub fn tab(&self, tab: ExamTab) -> Option<&TabView> {
        self.tabs.iter().find(|v| v.tab == tab)
    }
}
