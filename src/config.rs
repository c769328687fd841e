use crate::error::{AppError, Result};
use grades_common::{ExamTab, SessionContext, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// トークンを上書きする環境変数
pub const TOKEN_ENV: &str = "GRADES_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub access_token: Option<String>,
    pub login_id: Option<String>,
    pub is_admin: bool,
    /// 省略時のタブ（common/descriptive/high/open）
    pub default_tab: String,
    pub export_title: String,
    /// PDFに埋め込むTrueTypeフォント
    pub pdf_font: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: None,
            login_id: None,
            is_admin: false,
            default_tab: "common".into(),
            export_title: "成績レポート".into(),
            pdf_font: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("grades-dashboard").join("config.json"))
    }

    /// 省略時のタブ
    pub fn default_tab(&self) -> Result<ExamTab> {
        self.default_tab.parse().map_err(AppError::Config)
    }

    /// トークン（環境変数を優先）
    pub fn access_token(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Some(token);
            }
        }
        self.access_token.clone()
    }

    /// ルートガードに渡すセッション入力
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            access_token: self.access_token(),
            user: self.login_id.as_ref().map(|login_id| User {
                user_id: None,
                login_id: Some(login_id.clone()),
                is_admin: self.is_admin,
            }),
        }
    }
}
