//! # Coffee Label Fetch
//!
//! 从 ShipStation 拉取未发货订单，按 `<storeId>#<sku>` 在 Google Drive 共享盘中
//! 搜索标签图片，并下载到本地目录用于批量打印。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只负责与外部 API 通信
//! - `ShipStationClient` - 订单来源（`OrderSource`）
//! - `DriveClient` - 共享盘搜索与下载（`DriveApi`）
//!
//! ### ② 业务能力层（Services）
//! - `key_derivation` - 订单 → 检索键
//! - `AssetLocator` - 检索键 → 搜索结果（与来源键绑定）
//! - `AssetFetcher` - 搜索结果 → 本地文件
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/label_run` - 凭证加载、客户端构建、完整流程
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{KeyMatches, LocatedAsset, Order, OrderList, SearchKey};
pub use orchestrator::{App, LabelPipeline, RunSummary};
