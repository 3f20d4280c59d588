//! 标签图片拉取 - 编排层
//!
//! 流程：凭证 → 拉取订单 → 生成检索键 → 搜索图片 → 下载图片
//!
//! 订单拉取和凭证加载失败会终止运行；搜索和下载阶段的单项失败只记录日志。

use crate::clients::{DriveApi, DriveClient, OrderSource, ShipStationClient};
use crate::config::Config;
use crate::credentials::{self, AccessTokenProvider, InstalledFlowTokenProvider, StaticTokenProvider};
use crate::error::{AppError, AppResult};
use crate::services::{derive_search_keys, AssetFetcher, AssetLocator, FetchReport};
use crate::utils::logging;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use yup_oauth2::ApplicationSecret;

/// 一次运行的结果
#[derive(Debug)]
pub struct RunSummary {
    pub orders: usize,
    pub keys: usize,
    /// 搜索失败的键数
    pub search_failures: usize,
    pub report: FetchReport,
}

/// 与具体 API 无关的处理流程
pub struct LabelPipeline<O, D> {
    orders: O,
    drive: D,
    shared_drive_id: String,
    output_dir: PathBuf,
    concurrency: usize,
}

impl<O: OrderSource, D: DriveApi> LabelPipeline<O, D> {
    pub fn new(
        orders: O,
        drive: D,
        shared_drive_id: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Self {
        Self {
            orders,
            drive,
            shared_drive_id: shared_drive_id.into(),
            output_dir: output_dir.into(),
            concurrency,
        }
    }

    pub async fn run(&self) -> AppResult<RunSummary> {
        let order_list = self.orders.fetch_orders().await?;
        let keys = derive_search_keys(&order_list.orders);
        logging::log_keys_derived(order_list.orders.len(), keys.len());

        if keys.is_empty() {
            warn!("⚠️ 所有订单均已发货，没有需要打印的标签");
        }

        let locator = AssetLocator::new(&self.drive, self.shared_drive_id.as_str(), self.concurrency);
        let located = locator.locate(&keys).await;
        let search_failures = located.iter().filter(|entry| entry.is_failed()).count();

        let fetcher = AssetFetcher::new(&self.drive, self.output_dir.as_path(), self.concurrency);
        let report = fetcher.fetch_all(&located).await?;

        logging::print_final_stats(keys.len(), report.written.len(), report.missing.len(), report.failed.len());

        Ok(RunSummary {
            orders: order_list.orders.len(),
            keys: keys.len(),
            search_failures,
            report,
        })
    }
}

/// 应用主结构
pub struct App {
    pipeline: LabelPipeline<ShipStationClient, DriveClient>,
}

impl App {
    /// 初始化应用
    ///
    /// 所有凭证在发起任何远程请求之前加载完毕。两个凭证文件都会被检查，
    /// 缺失的模板一次全部生成，然后返回第一个凭证错误。
    pub async fn initialize(config: Config) -> AppResult<Self> {
        logging::log_startup(&config);

        let api_keys = credentials::load_api_keys(&config.api_key_file).await;
        let client_secret = if config.drive_access_token.is_some() {
            None
        } else {
            Some(credentials::load_client_secret(&config.drive_credentials_file).await)
        };

        if let (Err(_), Some(Err(e))) = (&api_keys, &client_secret) {
            warn!("❌ {}", e);
        }
        let api_keys = api_keys?;
        let client_secret = client_secret.transpose()?;

        let tokens = build_token_provider(&config, client_secret).await?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::transport("http client", e))?;

        let orders = ShipStationClient::new(http.clone(), &config.order_api_url, &api_keys)?;
        let drive = DriveClient::new(http, config.drive_api_base_url.clone(), tokens);

        Ok(Self {
            pipeline: LabelPipeline::new(
                orders,
                drive,
                config.shared_drive_id,
                config.output_dir,
                config.max_concurrent_requests,
            ),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        let summary = self.pipeline.run().await?;
        info!("✓ 已从 Google Drive 拉取标签图片");
        Ok(summary)
    }
}

async fn build_token_provider(
    config: &Config,
    client_secret: Option<ApplicationSecret>,
) -> AppResult<Arc<dyn AccessTokenProvider>> {
    let secret = match (&config.drive_access_token, client_secret) {
        (Some(token), _) => {
            info!("使用 DRIVE_ACCESS_TOKEN 访问 Google Drive");
            return Ok(Arc::new(StaticTokenProvider::new(token.clone())));
        }
        (None, Some(secret)) => secret,
        (None, None) => {
            return Err(AppError::CredentialMissing {
                path: config.drive_credentials_file.display().to_string(),
                hint: "未提供 Google Drive OAuth 客户端配置".to_string(),
            });
        }
    };

    let provider = InstalledFlowTokenProvider::new(secret, &config.drive_token_file).await?;
    // 首次运行时在这里完成交互式授权
    provider.access_token().await?;
    info!("✓ 已连接 Google Drive API");

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{MockDriveApi, MockOrderSource};
    use crate::models::{AdvancedOptions, LineItem, Order, OrderList};
    use tempfile::TempDir;

    #[test]
    fn empty_order_list_is_fatal() {
        let mut orders = MockOrderSource::new();
        orders.expect_fetch_orders().returning(|| {
            Err(AppError::EmptyResult {
                endpoint: "orders".to_string(),
            })
        });
        let mut drive = MockDriveApi::new();
        drive.expect_search_images().never();

        let dir = TempDir::new().unwrap();
        let pipeline = LabelPipeline::new(orders, drive, "drive", dir.path(), 1);

        let result = tokio_test::block_on(pipeline.run());

        assert!(matches!(result, Err(AppError::EmptyResult { .. })));
    }

    #[test]
    fn all_shipped_orders_download_nothing() {
        let mut orders = MockOrderSource::new();
        orders.expect_fetch_orders().returning(|| {
            Ok(OrderList {
                orders: vec![Order {
                    order_id: 1,
                    order_number: None,
                    ship_date: Some("2024-01-01".to_string()),
                    advanced_options: AdvancedOptions { store_id: 5 },
                    items: vec![LineItem {
                        sku: "X".to_string(),
                        quantity: 3,
                    }],
                }],
                total: Some(1),
                page: Some(1),
                pages: Some(1),
            })
        });
        let mut drive = MockDriveApi::new();
        drive.expect_search_images().never();
        drive.expect_download().never();

        let dir = TempDir::new().unwrap();
        let pipeline = LabelPipeline::new(orders, drive, "drive", dir.path().join("out"), 1);

        let summary = tokio_test::block_on(pipeline.run()).unwrap();

        assert_eq!(summary.orders, 1);
        assert_eq!(summary.keys, 0);
        assert!(summary.report.written.is_empty());
    }
}
