//! Excel生成（CLI版）
//!
//! 共通ライブラリで作ったバッファをファイルに書き出す。

use crate::error::{AppError, Result};
use grades_common::export::excel_core::generate_report_buffer;
use grades_common::DashboardReport;
use std::path::Path;

pub fn generate_excel(report: &DashboardReport, output_path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(report)
        .map_err(|e| AppError::ExcelGeneration(e.to_string()))?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, buffer)?;

    tracing::info!(
        path = %output_path.display(),
        sheets = report.tabs.len() * 3 + usize::from(report.first_preference.is_some()),
        "Excelを出力"
    );
    Ok(())
}
