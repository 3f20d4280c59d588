//! Google Drive 访问令牌
//!
//! 核心流程只依赖 [`AccessTokenProvider`]，交互式授权可以在测试中替换为固定令牌。

use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};
use yup_oauth2 as oauth2;
use yup_oauth2::authenticator::DefaultAuthenticator;

/// 只读访问云盘
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// 访问令牌提供者
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> AppResult<String>;
}

/// 固定令牌
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.token.clone())
    }
}

/// 基于 OAuth 已安装应用流程的令牌提供者
///
/// 首次运行时在终端打印授权链接并等待输入授权码，
/// 之后令牌保存在本地文件中重复使用。
pub struct InstalledFlowTokenProvider {
    auth: DefaultAuthenticator,
}

impl InstalledFlowTokenProvider {
    pub async fn new(secret: oauth2::ApplicationSecret, token_file: &Path) -> AppResult<Self> {
        info!("🔑 正在初始化 Google Drive 授权...");

        let auth = oauth2::InstalledFlowAuthenticator::builder(
            secret,
            oauth2::InstalledFlowReturnMethod::Interactive,
        )
        .persist_tokens_to_disk(token_file)
        .build()
        .await
        .map_err(|e| AppError::Auth {
            message: format!("无法创建授权器: {}", e),
        })?;

        Ok(Self { auth })
    }
}

#[async_trait]
impl AccessTokenProvider for InstalledFlowTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        let token = self
            .auth
            .token(&[DRIVE_READONLY_SCOPE])
            .await
            .map_err(|e| AppError::Auth {
                message: e.to_string(),
            })?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| AppError::Auth {
                message: "授权服务器未返回访问令牌".to_string(),
            })
    }
}

/// 读取 OAuth 客户端配置
///
/// 文件不存在时创建空文件并返回 [`AppError::CredentialMissing`]。
pub async fn load_client_secret(path: &Path) -> AppResult<oauth2::ApplicationSecret> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::write(path, b"").await.map_err(|e| AppError::io(path, e))?;
            warn!("⚠️ {} 不存在，已创建空文件", path.display());
            return Err(AppError::CredentialMissing {
                path: path.display().to_string(),
                hint: "请将 Google Drive OAuth 客户端配置 JSON 保存到该文件".to_string(),
            });
        }
        Err(e) => return Err(AppError::io(path, e)),
    };

    oauth2::parse_application_secret(&content).map_err(|e| AppError::CredentialInvalid {
        path: path.display().to_string(),
        reason: format!("无法解析 OAuth 客户端配置: {}", e),
    })
}
