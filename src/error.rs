use thiserror::Error;

/// 应用程序错误类型
///
/// 只有凭证加载和订单拉取属于致命错误；搜索/下载阶段的单项失败
/// 由调用方记录后跳过，不会以 `AppError` 的形式向上传播。
#[derive(Debug, Error)]
pub enum AppError {
    /// 凭证文件不存在（已自动创建模板）
    #[error("凭证文件不存在: {path}，已创建模板文件。{hint}")]
    CredentialMissing { path: String, hint: String },

    /// 凭证文件内容不完整或格式错误
    #[error("凭证文件无效 ({path}): {reason}")]
    CredentialInvalid { path: String, reason: String },

    /// OAuth 授权失败
    #[error("Google Drive 授权失败: {message}")]
    Auth { message: String },

    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// API 返回非 2xx 状态码
    #[error("API返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// 没有可处理的订单
    #[error("没有可处理的订单 ({endpoint})")]
    EmptyResult { endpoint: String },

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建 JSON 解析错误
    pub fn decode(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Decode {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建文件操作错误
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// 是否属于传输层错误（网络失败或错误状态码）
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport { .. } | AppError::BadStatus { .. })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
