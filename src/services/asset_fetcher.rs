//! 图片下载服务
//!
//! 每个键只下载第一个匹配文件，文件名取自来源键而不是云盘上的文件名，
//! 便于追溯到对应的订单和 SKU。

use crate::clients::DriveApi;
use crate::error::{AppError, AppResult};
use crate::models::{KeyMatches, LocatedAsset, SearchKey};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// 下载失败的条目
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub key: SearchKey,
    pub file_id: String,
    pub reason: String,
}

/// 下载阶段的汇总
#[derive(Debug, Default)]
pub struct FetchReport {
    /// 成功写入的文件
    pub written: Vec<PathBuf>,
    /// 没有可下载图片的键（未找到或搜索失败）
    pub missing: Vec<SearchKey>,
    pub failed: Vec<FailedItem>,
}

/// 生成输出文件名：`<清理后的键>---<序号>.png`
pub fn output_file_name(key: &SearchKey, position: usize) -> String {
    format!("{}---{}.png", sanitize_key(key.as_str()), position)
}

/// 文件名中不允许出现的字符（另外去掉所有控制字符）
const UNSAFE_FILE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// 去掉文件名中不允许出现的字符
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_control() && !UNSAFE_FILE_CHARS.contains(c))
        .collect()
}

pub struct AssetFetcher<'a, D: DriveApi + ?Sized> {
    drive: &'a D,
    output_dir: PathBuf,
    concurrency: usize,
}

impl<'a, D: DriveApi + ?Sized> AssetFetcher<'a, D> {
    pub fn new(drive: &'a D, output_dir: impl Into<PathBuf>, concurrency: usize) -> Self {
        Self {
            drive,
            output_dir: output_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// 下载所有键的第一个匹配文件
    ///
    /// 只有创建输出目录失败会返回错误，单个文件失败记录在报告中。
    pub async fn fetch_all(&self, located: &[KeyMatches]) -> AppResult<FetchReport> {
        if fs::metadata(&self.output_dir).await.is_err() {
            info!("📁 创建目录: {}", self.output_dir.display());
        }
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::io(&self.output_dir, e))?;

        let mut report = FetchReport::default();
        let mut plan = Vec::new();

        for entry in located {
            match entry.first_match() {
                Some(asset) => {
                    if entry.matches.len() > 1 {
                        debug!(
                            "[{}] {} 有 {} 个匹配，只下载第一个: {}",
                            entry.position,
                            entry.key,
                            entry.matches.len(),
                            asset
                        );
                    }
                    let dest = self.output_dir.join(output_file_name(&entry.key, entry.position));
                    plan.push((entry, asset, dest));
                }
                None => report.missing.push(entry.key.clone()),
            }
        }

        info!("⬇️ 开始下载 {} 个文件...", plan.len());

        let outcomes: Vec<_> = stream::iter(plan)
            .map(|(entry, asset, dest)| async move {
                let result = self.fetch_one(asset, &dest).await;
                (entry, asset, dest, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        for (entry, asset, dest, result) in outcomes {
            match result {
                Ok(()) => {
                    debug!("[{}] ✓ {}", entry.position, dest.display());
                    report.written.push(dest);
                }
                Err(e) => {
                    warn!("[{}] ❌ 无法下载 {}: {}", entry.position, entry.key, e);
                    report.failed.push(FailedItem {
                        key: entry.key.clone(),
                        file_id: asset.file_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// 下载单个文件并写入目标路径，父目录不存在时自动创建
    pub async fn fetch_one(&self, asset: &LocatedAsset, dest: &Path) -> AppResult<()> {
        let bytes = self.drive.download(&asset.file_id).await?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await.map_err(|e| AppError::io(parent, e))?;
        }
        fs::write(dest, bytes).await.map_err(|e| AppError::io(dest, e))?;

        Ok(())
    }
}
