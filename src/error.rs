use grades_common::AuthError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力が不正です: {0}")]
    InvalidInput(String),

    #[error("模試データがありません: {0}")]
    NoExams(String),

    #[error("認証エラー: {0}。`grades config --set-token TOKEN` でログインしてください")]
    Auth(#[from] AuthError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("{0}")]
    Common(#[from] grades_common::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
