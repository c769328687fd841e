//! セッションとルートガード
//!
//! ログイン状態は明示的な `SessionContext` として受け渡し、
//! 各ルートへのアクセス可否を `guard` で判定する。

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// 認証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("ログインが必要です（{redirect} へ移動）")]
    Unauthenticated { redirect: &'static str },

    #[error("管理者権限が必要です（{redirect} へ移動）")]
    Forbidden { redirect: &'static str },
}

/// ログインユーザー情報（`/auth/me` の応答）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub login_id: Option<String>,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub is_admin: bool,
}

/// セッションの入力（トークンとユーザー情報）
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub access_token: Option<String>,
    pub user: Option<User>,
}

/// 認証済みセッション
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: Option<User>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// `Authorization` ヘッダー値
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// 画面ルート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    SelectSearch,
    StudentSearch,
    StudentDetail,
    ExamSearch,
    ExamDetail,
    ImportStudents,
    ImportExams,
    AcademicYearUpdate,
    RegisterUser,
}

/// ルートに必要な権限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::SelectSearch => "/",
            Route::StudentSearch => "/students/search",
            Route::StudentDetail => "/students/:studentId",
            Route::ExamSearch => "/exams/search",
            Route::ExamDetail => "/exams/:examId",
            Route::ImportStudents => "/import/students",
            Route::ImportExams => "/import/exams",
            Route::AcademicYearUpdate => "/academic-year-update",
            Route::RegisterUser => "/admin/register",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login => Access::Public,
            Route::AcademicYearUpdate | Route::RegisterUser => Access::Admin,
            _ => Access::Authenticated,
        }
    }
}

impl SessionContext {
    fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// ルートへのアクセスを判定する
///
/// 公開ルートは常に通す（トークンがなければ空のセッション）。
pub fn guard(route: Route, ctx: &SessionContext) -> Result<Session, AuthError> {
    if route.access() == Access::Public {
        return Ok(Session {
            access_token: ctx.token().unwrap_or_default().to_string(),
            user: ctx.user.clone(),
        });
    }

    let token = ctx.token().ok_or(AuthError::Unauthenticated {
        redirect: Route::Login.path(),
    })?;

    let session = Session {
        access_token: token.to_string(),
        user: ctx.user.clone(),
    };

    if route.access() == Access::Admin && !session.is_admin() {
        tracing::warn!(route = route.path(), "管理者以外のアクセスを拒否");
        return Err(AuthError::Forbidden {
            redirect: Route::SelectSearch.path(),
        });
    }

    Ok(session)
}

fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::String(s)) => s == "true",
        _ => false,
    })
}
