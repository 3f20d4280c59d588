//! Google Drive v3 REST 客户端
//!
//! 只封装两个能力：在共享盘内按文件名搜索 PNG 图片、按 ID 下载文件内容

use crate::credentials::AccessTokenProvider;
use crate::error::{AppError, AppResult};
use crate::models::LocatedAsset;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// 标签图片的 MIME 类型
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// 云盘能力
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// 在共享盘内搜索文件名包含 `name_fragment` 的 PNG 文件
    async fn search_images(&self, name_fragment: &str, shared_drive_id: &str) -> AppResult<Vec<LocatedAsset>>;

    /// 下载文件的完整内容
    async fn download(&self, file_id: &str) -> AppResult<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

pub struct DriveClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl DriveClient {
    pub fn new(http: Client, base_url: impl Into<String>, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }
}

/// 构建搜索条件
pub fn build_image_query(name_fragment: &str) -> String {
    format!(
        "name contains '{}' and mimeType = '{}'",
        escape_query_literal(name_fragment),
        IMAGE_MIME_TYPE
    )
}

/// 文件内容下载地址，`file_id` 作为单个路径段编码
pub fn media_url(base_url: &str, file_id: &str) -> AppResult<Url> {
    let mut url = Url::parse(&format!("{}/drive/v3/files", base_url))
        .map_err(|e| AppError::Config(format!("无效的 Drive API 地址 {}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("Drive API 地址不能作为路径前缀: {}", base_url)))?
        .push(file_id);
    Ok(url)
}

// Drive 查询语法中字符串字面量需要转义 \ 和 '
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn search_images(&self, name_fragment: &str, shared_drive_id: &str) -> AppResult<Vec<LocatedAsset>> {
        let endpoint = format!("{}/drive/v3/files", self.base_url);
        let query = build_image_query(name_fragment);
        debug!("Drive 搜索: {}", query);

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(&endpoint)
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("driveId", shared_drive_id),
                ("corpora", "drive"),
                ("includeItemsFromAllDrives", "true"),
                ("supportsAllDrives", "true"),
                ("fields", "files(id,name)"),
                ("pageSize", "100"),
            ])
            .send()
            .await
            .map_err(|e| AppError::transport(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::transport(&endpoint, e))?;
        let list: FileList = serde_json::from_slice(&body).map_err(|e| AppError::decode(&endpoint, e))?;

        Ok(list
            .files
            .into_iter()
            .map(|file| LocatedAsset::new(file.id, file.name))
            .collect())
    }

    async fn download(&self, file_id: &str) -> AppResult<Vec<u8>> {
        let url = media_url(&self.base_url, file_id)?;
        let endpoint = url.to_string();

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(|e| AppError::transport(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::transport(&endpoint, e))?;
        debug!("已下载 {} ({} 字节)", file_id, bytes.len());

        Ok(bytes.to_vec())
    }
}
