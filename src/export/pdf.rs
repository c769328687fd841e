//! PDF生成（CLI版）
//!
//! 共通ライブラリで割り付けた第1志望判定推移をprintpdfで描く。

use crate::error::{AppError, Result};
use grades_common::export::pdf_core::{layout_trend, PdfPage, A4_HEIGHT_MM, A4_WIDTH_MM, CELL_FONT_SIZE};
use grades_common::FirstPreferenceTrend;
use printpdf::path::PaintMode;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const BORDER: u32 = 0xD0DCE5;
const TEXT: u32 = 0x1F2937;

fn rgb(color: u32) -> Color {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

fn draw_page(layer: &PdfLayerReference, page: &PdfPage, font: &IndirectFontRef) {
    layer.set_outline_color(rgb(BORDER));
    layer.set_outline_thickness(0.5);

    for cell in &page.cells {
        let rect = || {
            Rect::new(
                Mm(cell.x_mm),
                Mm(cell.y_mm),
                Mm(cell.x_mm + cell.width_mm),
                Mm(cell.y_mm + cell.height_mm),
            )
        };
        if let Some(fill) = cell.fill {
            layer.set_fill_color(rgb(fill));
            layer.add_rect(rect().with_mode(PaintMode::Fill));
        }
        layer.add_rect(rect().with_mode(PaintMode::Stroke));

        let (x, y) = cell.text_origin();
        layer.set_fill_color(rgb(TEXT));
        layer.use_text(cell.text.as_str(), CELL_FONT_SIZE, Mm(x), Mm(y), font);
    }

    layer.set_fill_color(rgb(TEXT));
    for text in &page.texts {
        layer.use_text(text.text.as_str(), text.size, Mm(text.x_mm), Mm(text.y_mm), font);
    }
}

/// 第1志望判定推移のPDFを出力
///
/// `font_path` にTrueTypeフォントを渡すと埋め込む。省略時は組み込みのHelveticaで、
/// 日本語の文字は描画されない。
pub fn generate_pdf(trend: &FirstPreferenceTrend, output_path: &Path, font_path: Option<&Path>) -> Result<()> {
    let title = format!("第1志望判定推移 {}", trend.title);
    let (doc, page1, layer1) = PdfDocument::new(title.as_str(), Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");

    let font = match font_path {
        Some(path) => {
            let file = File::open(path).map_err(|_| AppError::FileNotFound(path.display().to_string()))?;
            doc.add_external_font(file)
                .map_err(|e| AppError::PdfGeneration(format!("フォント読み込みエラー: {:?}", e)))?
        }
        None => {
            tracing::warn!("フォント未指定のため日本語は出力されません（--font で指定）");
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| AppError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?
        }
    };

    let pages = layout_trend(trend);
    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (page1, layer1)
        } else {
            doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), format!("Layer {}", i + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&layer, page, &font);
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))?;

    tracing::info!(path = %output_path.display(), pages = pages.len(), "PDFを出力");
    Ok(())
}
