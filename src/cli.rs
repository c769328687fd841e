use clap::{Parser, Subcommand};
use grades_common::{ChartMetric, ExamTab};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grades")]
#[command(about = "模試成績ダッシュボード集計・Excel/PDF出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// タブの表示データ（グラフ・得点表・判定一覧）をJSONで出力
    Dashboard {
        /// 生徒詳細または模試配列のJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// タブ (common/descriptive/high/open、省略時は設定値)
        #[arg(short, long)]
        tab: Option<ExamTab>,

        /// グラフの指標 (deviation/score-rate)
        #[arg(short, long, default_value = "deviation")]
        metric: ChartMetric,

        /// 判定一覧に表示する模試名（省略時は最新）
        #[arg(short, long)]
        exam: Option<String>,

        /// 追加で表示する科目
        #[arg(long)]
        check: Vec<String>,

        /// 非表示にする科目
        #[arg(long)]
        uncheck: Vec<String>,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 第1志望判定推移を表示
    Judgment {
        /// 生徒詳細または模試配列のJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（省略時は表形式で表示）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 受験科目・科目コード・表示色を一覧表示
    Subjects {
        /// 生徒詳細または模試配列のJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// タブ（省略時は全模試）
        #[arg(short, long)]
        tab: Option<ExamTab>,
    },

    /// 科目名を正規化して表示
    Normalize {
        /// 科目名
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// 成績レポートをExcel/PDFに出力
    Export {
        /// 生徒詳細または模試配列のJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートタイトル（省略時は設定値）
        #[arg(short, long)]
        title: Option<String>,

        /// グラフの指標 (deviation/score-rate)
        #[arg(short, long, default_value = "deviation")]
        metric: ChartMetric,

        /// 出力形式 (excel/pdf/both)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// PDFに埋め込むTrueTypeフォント（省略時は設定値）
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// アクセストークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// アクセストークンを削除
        #[arg(long)]
        clear_token: bool,

        /// ログインIDを設定
        #[arg(long)]
        login_id: Option<String>,

        /// 管理者フラグを設定
        #[arg(long)]
        admin: Option<bool>,

        /// 省略時のタブを設定
        #[arg(long)]
        default_tab: Option<ExamTab>,

        /// PDF用フォントを設定
        #[arg(long)]
        pdf_font: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 出力形式（PDFは第1志望判定推移のみ）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Pdf,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("both".parse::<ExportFormat>(), Ok(ExportFormat::Both));
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_defaults_to_excel() {
        let cli = Cli::parse_from(["grades", "export", "student.json"]);
        match cli.command {
            Commands::Export { format, font, .. } => {
                assert_eq!(format, ExportFormat::Excel);
                assert!(font.is_none());
            }
            _ => panic!("exportコマンドではない"),
        }
    }
}
