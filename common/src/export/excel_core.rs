//! Excel生成（共通ライブラリ）
//!
//! 成績レポートをタブごとの得点表・グラフ・判定一覧と第1志望判定推移のシートに書き出す。

use crate::dashboard::{ChartRows, TabView};
use crate::error::{Error, Result};
use crate::judgment::JudgmentGrade;
use crate::report::DashboardReport;
use crate::university::FirstPreferenceTrend;
use rust_xlsxwriter::*;

const HEADER_TEXT: u32 = 0x006580;
const HEADER_BG: u32 = 0xF0F5F9;
const BORDER: u32 = 0xD0DCE5;

/// チェック中の科目列の色の濃さ（元色の25%）
const SUBJECT_TINT: f64 = 0.25;

/// `#rrggbb` をRGB値に変換
pub fn parse_hex_color(hex: &str) -> Option<u32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// 白地に `alpha` の濃さで重ねた色
pub fn tint(rgb: u32, alpha: f64) -> u32 {
    let blend = |shift: u32| {
        let c = ((rgb >> shift) & 0xFF) as f64;
        let v = 255.0 - (255.0 - c) * alpha;
        (v.round() as u32).min(255) << shift
    };
    blend(16) | blend(8) | blend(0)
}

/// シート名に使えない文字を置き換える
pub fn sheet_name(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '*' | '[' | ']' | ':' => '・',
            _ => c,
        })
        .take(31)
        .collect()
}

fn xlsx_err(context: &str) -> impl Fn(XlsxError) -> Error + '_ {
    move |e| Error::Export(format!("{}: {}", context, e))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(HEADER_TEXT))
        .set_background_color(Color::RGB(HEADER_BG))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(BORDER))
}

fn cell_format() -> Format {
    Format::new()
        .set_font_size(10.0)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(BORDER))
}

fn grade_format(grade: &str) -> Format {
    cell_format()
        .set_align(FormatAlign::Center)
        .set_background_color(Color::RGB(JudgmentGrade::parse(grade).fill_color()))
}

fn write_grade(sheet: &mut Worksheet, row: u32, col: u16, grade: &str) -> Result<()> {
    let (text, format) = if grade.is_empty() {
        ("-", cell_format().set_align(FormatAlign::Center))
    } else {
        (grade, grade_format(grade))
    };
    sheet
        .write_string_with_format(row, col, text, &format)
        .map_err(xlsx_err("判定書き込みエラー"))?;
    Ok(())
}

/// 教科別得点シート
fn write_score_sheet(sheet: &mut Worksheet, view: &TabView) -> Result<()> {
    let header = header_format();
    let cell = cell_format();

    sheet.write_string_with_format(0, 0, "年度", &header).map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    sheet.write_string_with_format(0, 1, "模試名", &header).map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    sheet.set_column_width(1, 28.0).map_err(xlsx_err("列幅設定エラー"))?;

    let subjects = view.present_subjects();
    let subject_formats: Vec<(Format, Format)> = subjects
        .iter()
        .map(|subj| {
            let fill = view
                .checked
                .contains(*subj)
                .then(|| view.colors.get(*subj).and_then(|c| parse_hex_color(c)))
                .flatten()
                .map(|rgb| tint(rgb, SUBJECT_TINT));
            match fill {
                Some(rgb) => (
                    header_format().set_background_color(Color::RGB(rgb)),
                    cell_format().set_bold().set_background_color(Color::RGB(rgb)),
                ),
                None => (header_format(), cell_format()),
            }
        })
        .collect();

    for (i, subj) in subjects.iter().enumerate() {
        let col = (i + 2) as u16;
        sheet
            .write_string_with_format(0, col, *subj, &subject_formats[i].0)
            .map_err(xlsx_err("科目名書き込みエラー"))?;
    }

    for (r, row) in view.table.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        match row.exam_year {
            Some(year) => sheet.write_number_with_format(excel_row, 0, year as f64, &cell),
            None => sheet.write_string_with_format(excel_row, 0, "-", &cell),
        }
        .map_err(xlsx_err("年度書き込みエラー"))?;
        sheet
            .write_string_with_format(excel_row, 1, &row.name, &cell)
            .map_err(xlsx_err("模試名書き込みエラー"))?;

        for (i, (_, value)) in row.values.iter().enumerate() {
            let col = (i + 2) as u16;
            let format = &subject_formats[i].1;
            match value {
                Some(v) => sheet.write_number_with_format(excel_row, col, *v, format),
                None => sheet.write_string_with_format(excel_row, col, "", format),
            }
            .map_err(xlsx_err("得点書き込みエラー"))?;
        }
    }

    Ok(())
}

/// グラフシートの表
///
/// 1列目が模試名、続く `series` 列がグラフに描く値。得点率では素点列が後ろに付く。
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTable {
    pub headers: Vec<String>,
    pub rows: Vec<(String, Vec<Option<f64>>)>,
    pub series: usize,
}

/// 指標に応じたグラフの行を表にする
pub fn chart_table(view: &TabView) -> ChartTable {
    let subjects = &view.visible_subjects;
    let mut headers = vec!["模試名".to_string()];

    let rows = match &view.chart {
        ChartRows::Deviation(rows) => {
            headers.extend(subjects.iter().map(|s| s.to_string()));
            rows.iter()
                .map(|row| (row.name.clone(), subjects.iter().map(|s| row.get(s)).collect()))
                .collect()
        }
        ChartRows::ScoreRate(rows) => {
            headers.extend(subjects.iter().map(|s| format!("{}(%)", s)));
            headers.extend(subjects.iter().map(|s| format!("{}_素点", s)));
            rows.iter()
                .map(|row| {
                    let rates = subjects.iter().map(|s| row.get(s).map(|v| v.rate));
                    let originals = subjects.iter().map(|s| row.get(s).map(|v| v.original));
                    (row.name.clone(), rates.chain(originals).collect())
                })
                .collect()
        }
    };

    ChartTable {
        headers,
        rows,
        series: subjects.len(),
    }
}

/// 偏差値・得点率の推移シート（折れ線グラフ付き）
fn write_chart_sheet(sheet: &mut Worksheet, sheet_name: &str, view: &TabView) -> Result<()> {
    let header = header_format();
    let cell = cell_format();
    let table = chart_table(view);

    for (col, h) in table.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, h, &header)
            .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    }
    sheet.set_column_width(0, 28.0).map_err(xlsx_err("列幅設定エラー"))?;

    for (r, (name, values)) in table.rows.iter().enumerate() {
        let row = (r + 1) as u32;
        sheet
            .write_string_with_format(row, 0, name, &cell)
            .map_err(xlsx_err("模試名書き込みエラー"))?;
        // 値のない点は空セルのまま（グラフでは前後をつなぐ）
        for (i, value) in values.iter().enumerate() {
            if let Some(v) = value {
                sheet
                    .write_number_with_format(row, (i + 1) as u16, *v, &cell)
                    .map_err(xlsx_err("グラフ値書き込みエラー"))?;
            }
        }
    }

    if table.series == 0 || table.rows.is_empty() {
        return Ok(());
    }

    let last_row = table.rows.len() as u32;
    let mut chart = Chart::new(ChartType::Line);
    chart.show_empty_cells_as(ChartEmptyCells::Connected);
    chart.y_axis().set_name(match view.chart {
        ChartRows::Deviation(_) => "偏差値",
        ChartRows::ScoreRate(_) => "得点率(%)",
    });

    for (i, subject) in view.visible_subjects.iter().enumerate() {
        let col = (i + 1) as u16;
        let series = chart
            .add_series()
            .set_categories((sheet_name, 1, 0, last_row, 0))
            .set_values((sheet_name, 1, col, last_row, col))
            .set_name((sheet_name, 0, col));
        if let Some(rgb) = view.colors.get(subject).and_then(|c| parse_hex_color(c)) {
            series.set_format(ChartLine::new().set_color(Color::RGB(rgb)));
        }
    }

    let chart_col = (table.headers.len() + 1) as u16;
    sheet
        .insert_chart(1, chart_col, &chart)
        .map_err(xlsx_err("グラフ挿入エラー"))?;
    Ok(())
}

/// 志望校判定一覧シート
fn write_judgment_sheet(sheet: &mut Worksheet, view: &TabView) -> Result<()> {
    let header = header_format();
    let cell = cell_format();

    let exam_label = format!("模試: {}", view.selected_exam.as_deref().unwrap_or("-"));
    sheet
        .write_string_with_format(0, 0, &exam_label, &Format::new().set_bold())
        .map_err(xlsx_err("模試名書き込みエラー"))?;

    let headers = ["志望順位", "大学名", "学部", "募集区分", "共テ判定", "2次判定", "総合判定"];
    for (col, h) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(1, col as u16, *h, &header)
            .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    }
    sheet.set_column_width(1, 24.0).map_err(xlsx_err("列幅設定エラー"))?;
    sheet.set_column_width(2, 18.0).map_err(xlsx_err("列幅設定エラー"))?;

    for (r, j) in view.judgments.iter().enumerate() {
        let row = (r + 2) as u32;
        let order = j.preference_order.map(|o| o.to_string()).unwrap_or_else(|| "-".into());
        for (col, text) in [order.as_str(), j.uni.as_str(), j.dept.as_str(), j.recruit.as_str()].into_iter().enumerate() {
            sheet
                .write_string_with_format(row, col as u16, text, &cell)
                .map_err(xlsx_err("判定一覧書き込みエラー"))?;
        }
        write_grade(sheet, row, 4, &j.judgement_kyote)?;
        write_grade(sheet, row, 5, &j.judgement_niji)?;
        write_grade(sheet, row, 6, &j.judgement_sougou)?;
    }

    Ok(())
}

/// 第1志望判定推移シート
fn write_trend_sheet(sheet: &mut Worksheet, trend: &FirstPreferenceTrend) -> Result<()> {
    let header = header_format();
    let label = cell_format().set_bold();

    sheet
        .write_string_with_format(0, 0, &format!("第１志望：{}", trend.title), &Format::new().set_bold().set_font_size(12.0))
        .map_err(xlsx_err("タイトル書き込みエラー"))?;

    let mut row: u32 = 2;
    for section in &trend.sections {
        sheet
            .write_string_with_format(row, 0, section.bucket.label(), &Format::new().set_bold())
            .map_err(xlsx_err("区分書き込みエラー"))?;
        row += 1;

        sheet
            .write_string_with_format(row, 0, "判定種別", &header)
            .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
        for (i, column) in section.columns.iter().enumerate() {
            sheet
                .write_string_with_format(row, (i + 1) as u16, &column.short_name, &header)
                .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
        }
        row += 1;

        if section.shows_kyote() {
            sheet
                .write_string_with_format(row, 0, "共テ", &label)
                .map_err(xlsx_err("判定種別書き込みエラー"))?;
            for (i, column) in section.columns.iter().enumerate() {
                write_grade(sheet, row, (i + 1) as u16, &column.judgement_kyote)?;
            }
            row += 1;
        }

        sheet
            .write_string_with_format(row, 0, "2次", &label)
            .map_err(xlsx_err("判定種別書き込みエラー"))?;
        for (i, column) in section.columns.iter().enumerate() {
            write_grade(sheet, row, (i + 1) as u16, &column.judgement_niji)?;
        }
        row += 2;
    }

    Ok(())
}

/// 成績レポートのExcelをバッファに生成
pub fn generate_report_buffer(report: &DashboardReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for view in &report.tabs {
        let label = sheet_name(view.tab.label());

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(format!("{}_得点", label))
            .map_err(xlsx_err("シート名設定エラー"))?;
        write_score_sheet(sheet, view)?;

        let chart_name = format!("{}_推移", label);
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&chart_name)
            .map_err(xlsx_err("シート名設定エラー"))?;
        write_chart_sheet(sheet, &chart_name, view)?;

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(format!("{}_判定", label))
            .map_err(xlsx_err("シート名設定エラー"))?;
        write_judgment_sheet(sheet, view)?;
    }

    if let Some(trend) = &report.first_preference {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("第1志望判定推移")
            .map_err(xlsx_err("シート名設定エラー"))?;
        write_trend_sheet(sheet, trend)?;
    }

    // 空のブックは開けないので1枚は作る
    if report.tabs.is_empty() && report.first_preference.is_none() {
        let sheet = workbook.add_worksheet();
        sheet
            .write_string(0, 0, "データがありません")
            .map_err(xlsx_err("書き込みエラー"))?;
    }

    workbook.save_to_buffer().map_err(xlsx_err("Excel保存エラー"))
}
