//! ShipStation API 密钥文件
//!
//! 文件格式为两行：
//!
//! ```text
//! PUBLIC KEY: <public>
//! PRIVATE KEY: <private>
//! ```

use crate::error::{AppError, AppResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 密钥文件不存在时写入的模板
pub const KEY_FILE_TEMPLATE: &str = "PUBLIC KEY: \nPRIVATE KEY: ";

const PUBLIC_PREFIX: &str = "PUBLIC KEY:";
const PRIVATE_PREFIX: &str = "PRIVATE KEY:";

/// ShipStation API 密钥对
#[derive(Clone)]
pub struct ApiKeys {
    pub public_key: String,
    pub private_key: String,
}

impl ApiKeys {
    /// `Authorization: Basic` 头的值（不含 `Basic ` 前缀）
    pub fn basic_auth_value(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.public_key, self.private_key))
    }
}

// 不输出密钥内容
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys").finish_non_exhaustive()
    }
}

/// 读取密钥文件
///
/// 文件不存在时创建模板并返回 [`AppError::CredentialMissing`]，
/// 由调用方终止程序，等待操作员填写。
pub async fn load_api_keys(path: &Path) -> AppResult<ApiKeys> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::write(path, KEY_FILE_TEMPLATE)
                .await
                .map_err(|e| AppError::io(path, e))?;
            warn!("⚠️ {} 不存在，已创建模板文件", path.display());
            return Err(AppError::CredentialMissing {
                path: path.display().to_string(),
                hint: "请填写 PUBLIC KEY 和 PRIVATE KEY 后重新运行".to_string(),
            });
        }
        Err(e) => return Err(AppError::io(path, e)),
    };

    let keys = parse_api_keys(&content).map_err(|reason| AppError::CredentialInvalid {
        path: path.display().to_string(),
        reason,
    })?;

    info!("✓ 已读取 ShipStation 密钥文件");
    Ok(keys)
}

/// 解析密钥文件内容
pub fn parse_api_keys(content: &str) -> Result<ApiKeys, String> {
    let mut public_key = None;
    let mut private_key = None;

    for line in content.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix(PUBLIC_PREFIX) {
            public_key = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(PRIVATE_PREFIX) {
            private_key = Some(value.trim().to_string());
        }
    }

    match (public_key, private_key) {
        (Some(public_key), Some(private_key)) if !public_key.is_empty() && !private_key.is_empty() => {
            Ok(ApiKeys {
                public_key,
                private_key,
            })
        }
        _ => Err("密钥未正确设置，需要 PUBLIC KEY 和 PRIVATE KEY 两行".to_string()),
    }
}
