//! 编排层（Orchestration Layer）
//!
//! ```text
//! App (凭证、HTTP 客户端)
//!     ↓
//! LabelPipeline (订单 → 检索键 → 搜索 → 下载)
//!     ↓
//! services (key_derivation / asset_locator / asset_fetcher)
//!     ↓
//! clients (ShipStation / Google Drive)
//! ```

pub mod label_run;

pub use label_run::{App, LabelPipeline, RunSummary};
