//! 图片定位服务
//!
//! 为每个检索键在共享盘中搜索图片，结果与来源键绑定返回。
//! 单个键搜索失败只记录日志，不影响其他键。

use crate::clients::DriveApi;
use crate::models::{KeyMatches, SearchKey};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

pub struct AssetLocator<'a, D: DriveApi + ?Sized> {
    drive: &'a D,
    shared_drive_id: String,
    concurrency: usize,
}

impl<'a, D: DriveApi + ?Sized> AssetLocator<'a, D> {
    pub fn new(drive: &'a D, shared_drive_id: impl Into<String>, concurrency: usize) -> Self {
        Self {
            drive,
            shared_drive_id: shared_drive_id.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// 按键顺序返回每个键的搜索结果
    pub async fn locate(&self, keys: &[SearchKey]) -> Vec<KeyMatches> {
        info!("🔍 正在共享盘中搜索 {} 个标签图片...", keys.len());

        let results: Vec<KeyMatches> = stream::iter(keys.iter().enumerate())
            .map(|(idx, key)| self.locate_one(idx + 1, key))
            .buffered(self.concurrency)
            .collect()
            .await;

        let found = results.iter().filter(|r| !r.matches.is_empty()).count();
        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!("✓ 搜索完成: 找到 {}/{}，失败 {}", found, keys.len(), failed);

        results
    }

    async fn locate_one(&self, position: usize, key: &SearchKey) -> KeyMatches {
        match self.drive.search_images(key.as_str(), &self.shared_drive_id).await {
            Ok(matches) => {
                if matches.is_empty() {
                    warn!("[{}] 未找到图片: {}", position, key);
                } else {
                    for asset in &matches {
                        debug!("[{}] {} → {}", position, key, asset);
                    }
                }
                KeyMatches {
                    position,
                    key: key.clone(),
                    matches,
                    search_error: None,
                }
            }
            Err(e) => {
                warn!("[{}] ❌ 搜索失败 {}: {}", position, key, e);
                KeyMatches {
                    position,
                    key: key.clone(),
                    matches: Vec::new(),
                    search_error: Some(e.to_string()),
                }
            }
        }
    }
}
