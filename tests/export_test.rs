//! Excel/PDF出力の統合テスト

use grades_common::{ChartMetric, DashboardReport, TabOptions};
use grades_dashboard::export::{self, excel, pdf};
use grades_dashboard::loader;
use tempfile::tempdir;

const STUDENT_JSON: &str = r#"{
    "student_id": 1001,
    "name": "山田太郎",
    "grade": "3",
    "exams": [
        {
            "exam_id": 3,
            "exam_name": "全統高2模試",
            "exam_year": 2024,
            "exam_type": "高1/高2",
            "scores": null,
            "judgements": null
        },
        {
            "exam_id": 1,
            "exam_name": "第1回全統共通テスト模試",
            "exam_year": 2025,
            "exam_type": "共テ",
            "scores": [
                {"subject_name": "英語R", "subject_code": 1100, "score": 80, "deviation_value": 60.5},
                {"subject_name": "数学I", "subject_code": "2100", "score": 65, "deviation_value": 55.0},
                {"subject_name": "総合", "subject_code": 7100, "score": 600, "deviation_value": 58.2}
            ],
            "judgements": [
                {"preference_order": 1, "university_name": "東京大学", "faculty_name": "理科一類", "department_name": "前期", "judgement_kyote": "B", "judgement_niji": "C"},
                {"preference_order": 2, "university_name": "京都大学", "faculty_name": "工学部", "department_name": "前期", "judgement_kyote": "A", "judgement_niji": "B"}
            ]
        },
        {
            "exam_id": 2,
            "exam_name": "第1回全統記述模試",
            "exam_year": 2025,
            "exam_type": "記述",
            "scores": [
                {"subject_name": "英語", "subject_code": 1000, "score": 120, "deviation_value": 62.0}
            ],
            "judgements": [
                {"preference_order": 1, "university_name": "東京大学", "faculty_name": "理科一類", "department_name": "前期", "judgement_niji": "B"}
            ]
        }
    ]
}"#;

#[test]
fn test_excel_generation_from_student_detail() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("student.json");
    std::fs::write(&input, STUDENT_JSON).expect("入力ファイル作成失敗");

    let exams = loader::load_exams(&input).expect("読み込み失敗");
    assert_eq!(exams.len(), 3);

    let report = DashboardReport::build(&exams, "成績レポート", &TabOptions::default());
    assert_eq!(report.tabs.len(), 3);
    let trend = report.first_preference.as_ref().expect("第1志望の判定推移がない");
    assert_eq!(trend.title, "東京大学 理科一類 前期");
    assert_eq!(trend.sections.len(), 2);

    let output_path = dir.path().join("report.xlsx");
    let result = excel::generate_excel(&report, &output_path);
    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    assert!(output_path.exists(), "Excelファイルが作成されていない");

    let metadata = std::fs::metadata(&output_path).expect("ファイルメタデータ取得失敗");
    assert!(metadata.len() > 0, "Excelファイルが空");
}

#[test]
fn test_excel_generation_score_rate() {
    let dir = tempdir().expect("Failed to create temp dir");
    let exams = loader::parse_exams(STUDENT_JSON).expect("解析失敗");

    let options = TabOptions {
        metric: ChartMetric::ScoreRate,
        ..Default::default()
    };
    let report = DashboardReport::build(&exams, "得点率", &options);

    let output_path = dir.path().join("nested").join("rate.xlsx");
    let result = excel::generate_excel(&report, &output_path);
    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    assert!(output_path.exists());
}

/// 最新の模試に判定がなければ判定推移は作られない
#[test]
fn test_no_trend_when_latest_exam_has_no_judgements() {
    let mut exams = loader::parse_exams(STUDENT_JSON).expect("解析失敗");
    exams.rotate_left(1);
    assert_eq!(exams.last().map(|ex| ex.name()), Some("全統高2模試"));

    let report = DashboardReport::build(&exams, "成績レポート", &TabOptions::default());
    assert!(report.first_preference.is_none());
}

#[test]
fn test_excel_generation_empty_report() {
    let dir = tempdir().expect("Failed to create temp dir");
    let report = DashboardReport::build(&[], "空", &TabOptions::default());

    let output_path = dir.path().join("empty.xlsx");
    let result = excel::generate_excel(&report, &output_path);
    assert!(result.is_ok(), "空データでExcel生成に失敗: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_output_path_in_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let date = chrono::NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
    let path = export::output_path(dir.path(), "成績レポート", date, "xlsx");
    assert_eq!(path, dir.path().join("成績レポート_2025-12-24.xlsx"));

    let path = export::output_path(dir.path(), export::PDF_TITLE, date, "pdf");
    assert_eq!(path, dir.path().join("第一志望判定推移_2025-12-24.pdf"));
}

#[test]
fn test_pdf_generation_first_preference() {
    let dir = tempdir().expect("Failed to create temp dir");
    let exams = loader::parse_exams(STUDENT_JSON).expect("解析失敗");
    let report = DashboardReport::build(&exams, "成績レポート", &TabOptions::default());
    let trend = report.first_preference.as_ref().expect("第1志望の判定推移がない");

    let output_path = dir.path().join("trend.pdf");
    let result = pdf::generate_pdf(trend, &output_path, None);
    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());
    assert!(output_path.exists(), "PDFファイルが作成されていない");

    let bytes = std::fs::read(&output_path).expect("PDF読み込み失敗");
    assert!(!bytes.is_empty(), "PDFファイルが空");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダーがない");
}

#[test]
fn test_pdf_generation_many_exams() {
    // 1ページに収まらない列数・区分でも出力できる
    let exams: Vec<grades_common::Exam> = (1..=40)
        .map(|i| {
            let exam_type = ["共テ", "記述", "高1/高2", "OP"][i % 4];
            serde_json::from_value(serde_json::json!({
                "exam_name": format!("第{}回模試", i),
                "exam_type": exam_type,
                "judgements": [{"preference_order": 1, "university_name": "東京大学", "judgement_kyote": "A", "judgement_niji": "E"}]
            }))
            .unwrap()
        })
        .collect();
    let trend = grades_common::first_preference_trend(&exams).expect("判定推移がない");
    assert_eq!(trend.sections.len(), 4);

    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("nested").join("many.pdf");
    let result = pdf::generate_pdf(&trend, &output_path, None);
    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());
    assert!(output_path.exists());
}

#[test]
fn test_pdf_generation_missing_font() {
    let dir = tempdir().expect("Failed to create temp dir");
    let exams = loader::parse_exams(STUDENT_JSON).expect("解析失敗");
    let trend = grades_common::first_preference_trend(&exams).expect("判定推移がない");

    let output_path = dir.path().join("trend.pdf");
    let font = dir.path().join("missing.ttf");
    let result = pdf::generate_pdf(&trend, &output_path, Some(&font));
    assert!(matches!(result, Err(grades_dashboard::error::AppError::FileNotFound(_))));
    assert!(!output_path.exists());
}
