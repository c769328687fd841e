pub mod excel;
pub mod pdf;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// PDFファイル名の既定タイトル
pub const PDF_TITLE: &str = "第一志望判定推移";

/// 既定のファイル名（`{タイトル}_{YYYY-MM-DD}.{拡張子}`）
pub fn default_file_name(title: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", title, date.format("%Y-%m-%d"), extension)
}

/// 出力先を解決する（ディレクトリまたは拡張子なしなら既定ファイル名を付ける）
pub fn output_path(output: &Path, title: &str, date: NaiveDate, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_file_name(title, date, extension))
    } else {
        output.to_path_buf()
    }
}

/// 両形式の出力先（PDF, Excel）
///
/// ファイル指定ならその名前の拡張子違い、ディレクトリなら各形式の既定ファイル名。
pub fn output_paths_for_both(output: &Path, title: &str, date: NaiveDate) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(default_file_name(PDF_TITLE, date, "pdf")),
            output.join(default_file_name(title, date, "xlsx")),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or(title);
        (
            parent.join(format!("{}.pdf", stem)),
            parent.join(format!("{}.xlsx", stem)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("成績レポート", date(), "xlsx"), "成績レポート_2025-04-01.xlsx");
        assert_eq!(default_file_name(PDF_TITLE, date(), "pdf"), "第一志望判定推移_2025-04-01.pdf");
    }

    #[test]
    fn test_output_path_with_file() {
        let path = output_path(Path::new("out/report.xlsx"), "成績", date(), "xlsx");
        assert_eq!(path, PathBuf::from("out/report.xlsx"));
    }

    #[test]
    fn test_output_path_without_extension() {
        let path = output_path(Path::new("out"), "成績", date(), "xlsx");
        assert_eq!(path, PathBuf::from("out/成績_2025-04-01.xlsx"));
    }

    #[test]
    fn test_output_paths_for_both() {
        let (pdf, excel) = output_paths_for_both(Path::new("out"), "成績", date());
        assert_eq!(pdf, PathBuf::from("out/第一志望判定推移_2025-04-01.pdf"));
        assert_eq!(excel, PathBuf::from("out/成績_2025-04-01.xlsx"));

        let (pdf, excel) = output_paths_for_both(Path::new("out/report.xlsx"), "成績", date());
        assert_eq!(pdf, PathBuf::from("out/report.pdf"));
        assert_eq!(excel, PathBuf::from("out/report.xlsx"));
    }
}
