//! PDF出力の共通部分
//!
//! 第1志望判定推移をA4縦のページに並べる。座標はmm単位で、原点はページ左下。
//! 列が多い区分は横幅に収まる列数ごとに折り返し、下端を越えたら改ページする。

use crate::judgment::JudgmentGrade;
use crate::university::{FirstPreferenceTrend, TrendColumn};

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 15.0;

pub const TITLE_FONT_SIZE: f32 = 14.0;
pub const LABEL_FONT_SIZE: f32 = 11.0;
pub const CELL_FONT_SIZE: f32 = 9.0;

const TITLE_HEIGHT_MM: f32 = 14.0;
const SECTION_LABEL_HEIGHT_MM: f32 = 8.0;
const ROW_HEIGHT_MM: f32 = 8.0;
const LABEL_WIDTH_MM: f32 = 20.0;
const COLUMN_WIDTH_MM: f32 = 18.0;
const SECTION_GAP_MM: f32 = 6.0;

/// 見出しセルの背景色
pub const HEADER_FILL: u32 = 0xF0F5F9;

/// ページ上の文字列
#[derive(Debug, Clone, PartialEq)]
pub struct PdfText {
    pub x_mm: f32,
    pub y_mm: f32,
    pub size: f32,
    pub text: String,
}

/// 罫線付きのセル（`fill` があれば塗りつぶす）
#[derive(Debug, Clone, PartialEq)]
pub struct PdfCell {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub text: String,
    pub fill: Option<u32>,
}

impl PdfCell {
    /// セル内の文字の基準位置
    pub fn text_origin(&self) -> (f32, f32) {
        (self.x_mm + 1.5, self.y_mm + (self.height_mm - CELL_FONT_SIZE * 0.3528) / 2.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub texts: Vec<PdfText>,
    pub cells: Vec<PdfCell>,
}

/// 1行に並べられる模試の列数
pub fn columns_per_row() -> usize {
    ((A4_WIDTH_MM - MARGIN_MM * 2.0 - LABEL_WIDTH_MM) / COLUMN_WIDTH_MM).floor() as usize
}

struct Cursor {
    pages: Vec<PdfPage>,
    y_mm: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PdfPage::default()],
            y_mm: A4_HEIGHT_MM - MARGIN_MM,
        }
    }

    /// 残りの高さが足りなければ改ページ
    fn reserve(&mut self, height_mm: f32) {
        if self.y_mm - height_mm < MARGIN_MM && !self.current().cells.is_empty() {
            self.pages.push(PdfPage::default());
            self.y_mm = A4_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn current(&mut self) -> &mut PdfPage {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text(&mut self, x_mm: f32, height_mm: f32, size: f32, text: String) {
        self.y_mm -= height_mm;
        let y_mm = self.y_mm + 2.0;
        self.current().texts.push(PdfText { x_mm, y_mm, size, text });
    }

    /// 見出し＋値のセルを1行分置く
    fn row<I>(&mut self, label: &str, label_fill: Option<u32>, cells: I)
    where
        I: IntoIterator<Item = (String, Option<u32>)>,
    {
        self.y_mm -= ROW_HEIGHT_MM;
        let y_mm = self.y_mm;
        let page = self.current();
        page.cells.push(PdfCell {
            x_mm: MARGIN_MM,
            y_mm,
            width_mm: LABEL_WIDTH_MM,
            height_mm: ROW_HEIGHT_MM,
            text: label.to_string(),
            fill: label_fill,
        });
        for (i, (text, fill)) in cells.into_iter().enumerate() {
            page.cells.push(PdfCell {
                x_mm: MARGIN_MM + LABEL_WIDTH_MM + i as f32 * COLUMN_WIDTH_MM,
                y_mm,
                width_mm: COLUMN_WIDTH_MM,
                height_mm: ROW_HEIGHT_MM,
                text,
                fill,
            });
        }
    }
}

fn grade_cell(grade: &str, display: &str) -> (String, Option<u32>) {
    let fill = (!grade.is_empty()).then(|| JudgmentGrade::parse(grade).fill_color());
    (display.to_string(), fill)
}

/// 判定推移をページに割り付ける
pub fn layout_trend(trend: &FirstPreferenceTrend) -> Vec<PdfPage> {
    let mut cursor = Cursor::new();
    cursor.text(MARGIN_MM, TITLE_HEIGHT_MM, TITLE_FONT_SIZE, format!("第１志望：{}", trend.title));

    let per_row = columns_per_row().max(1);
    for section in &trend.sections {
        let rows = if section.shows_kyote() { 3.0 } else { 2.0 };
        for chunk in section.columns.chunks(per_row) {
            cursor.reserve(SECTION_LABEL_HEIGHT_MM + ROW_HEIGHT_MM * rows);
            cursor.text(MARGIN_MM, SECTION_LABEL_HEIGHT_MM, LABEL_FONT_SIZE, section.bucket.label().to_string());

            cursor.row(
                "判定種別",
                Some(HEADER_FILL),
                chunk.iter().map(|c| (c.short_name.clone(), Some(HEADER_FILL))),
            );
            if section.shows_kyote() {
                cursor.row(
                    "共テ",
                    None,
                    chunk.iter().map(|c: &TrendColumn| grade_cell(&c.judgement_kyote, c.kyote_display())),
                );
            }
            cursor.row(
                "2次",
                None,
                chunk.iter().map(|c: &TrendColumn| grade_cell(&c.judgement_niji, c.niji_display())),
            );
        }
        cursor.y_mm -= SECTION_GAP_MM;
    }

    cursor.pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::university::{ExamBucket, FirstPreference, TrendSection};

    fn column(i: usize, kyote: &str, niji: &str) -> TrendColumn {
        TrendColumn {
            exam_name: format!("第{}回全統共通テスト模試", i),
            short_name: format!("第{}回", i),
            judgement_kyote: kyote.into(),
            judgement_niji: niji.into(),
        }
    }

    fn trend(sections: Vec<TrendSection>) -> FirstPreferenceTrend {
        FirstPreferenceTrend {
            anchor: FirstPreference {
                university_name: "東京大学".into(),
                faculty_name: "理科一類".into(),
                department_name: "前期".into(),
            },
            title: "東京大学 理科一類 前期".into(),
            sections,
        }
    }

    #[test]
    fn test_layout_single_section() {
        let t = trend(vec![TrendSection {
            bucket: ExamBucket::CommonTest,
            columns: vec![column(1, "A", "B"), column(2, "", "C")],
        }]);
        let pages = layout_trend(&t);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].texts[0].text, "第１志望：東京大学 理科一類 前期");
        assert_eq!(pages[0].texts[1].text, "共テ");

        // 見出し・共テ・2次の3行 × (ラベル + 2列)
        assert_eq!(pages[0].cells.len(), 9);
        let kyote: Vec<&PdfCell> = pages[0].cells[3..6].iter().collect();
        assert_eq!(kyote[0].text, "共テ");
        assert_eq!(kyote[1].fill, Some(JudgmentGrade::A.fill_color()));
        // 空の判定は `-` で塗らない
        assert_eq!(kyote[2].text, "-");
        assert_eq!(kyote[2].fill, None);
    }

    #[test]
    fn test_descriptive_section_has_no_kyote_row() {
        let t = trend(vec![TrendSection {
            bucket: ExamBucket::Descriptive,
            columns: vec![column(1, "A", "B")],
        }]);
        let pages = layout_trend(&t);
        let labels: Vec<&str> = pages[0]
            .cells
            .iter()
            .filter(|c| c.x_mm == MARGIN_MM)
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(labels, vec!["判定種別", "2次"]);
    }

    #[test]
    fn test_wide_section_wraps_columns() {
        let per_row = columns_per_row();
        let columns: Vec<TrendColumn> = (1..=per_row + 1).map(|i| column(i, "B", "C")).collect();
        let t = trend(vec![TrendSection {
            bucket: ExamBucket::CommonTest,
            columns,
        }]);
        let pages = layout_trend(&t);
        // 区分ラベルが2回出る
        let labels = pages[0].texts.iter().filter(|t| t.text == "共テ").count();
        assert_eq!(labels, 2);

        let max_x = pages[0].cells.iter().map(|c| c.x_mm + c.width_mm).fold(0.0, f32::max);
        assert!(max_x <= A4_WIDTH_MM - MARGIN_MM);
    }

    #[test]
    fn test_many_sections_break_pages() {
        let sections: Vec<TrendSection> = (0..20)
            .map(|_| TrendSection {
                bucket: ExamBucket::CommonTest,
                columns: vec![column(1, "A", "A")],
            })
            .collect();
        let pages = layout_trend(&trend(sections));
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.cells.iter().all(|c| c.y_mm >= MARGIN_MM));
        }
    }
}
