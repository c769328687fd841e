//! 模試データの読み込み
//!
//! 生徒詳細（`{ "exams": [...] }`）と模試配列のどちらのJSONも受け付ける。

use crate::error::{AppError, Result};
use grades_common::{Exam, ExamsDocument};
use serde_json::Value;
use std::path::Path;

/// JSON文字列から模試リストを読む
///
/// 配列か `exams` を持つオブジェクト以外は入力不正とする。
pub fn parse_exams(content: &str) -> Result<Vec<Exam>> {
    let value: Value = serde_json::from_str(content)?;
    match &value {
        Value::Array(_) => {}
        Value::Object(map) if map.contains_key("exams") => {}
        Value::Object(_) => {
            return Err(AppError::InvalidInput("`exams` がありません".into()));
        }
        _ => {
            return Err(AppError::InvalidInput(
                "生徒詳細のオブジェクトか模試の配列を指定してください".into(),
            ));
        }
    }

    let document: ExamsDocument = serde_json::from_value(value)?;
    Ok(document.into_exams())
}

/// JSONファイルから模試リストを読む
pub fn load_exams(path: &Path) -> Result<Vec<Exam>> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let exams = parse_exams(&content)?;
    tracing::debug!(path = %path.display(), exams = exams.len(), "模試データを読み込み");
    Ok(exams)
}

/// 模試リストが空でないことを確認
pub fn require_exams(exams: Vec<Exam>, path: &Path) -> Result<Vec<Exam>> {
    if exams.is_empty() {
        return Err(AppError::NoExams(path.display().to_string()));
    }
    Ok(exams)
}
