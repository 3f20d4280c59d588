//! ShipStation 订单 API 客户端
//!
//! 一次请求拉取当前凭证可见的全部订单（仅第一页）

use crate::credentials::ApiKeys;
use crate::error::{AppError, AppResult};
use crate::models::OrderList;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HOST};
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

/// 订单来源
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// 拉取订单列表；列表为空时返回 [`AppError::EmptyResult`]
    async fn fetch_orders(&self) -> AppResult<OrderList>;
}

pub struct ShipStationClient {
    http: Client,
    url: Url,
    host: String,
    authorization: String,
}

impl ShipStationClient {
    pub fn new(http: Client, order_api_url: &str, keys: &ApiKeys) -> AppResult<Self> {
        let url = Url::parse(order_api_url)
            .map_err(|e| AppError::Config(format!("无效的订单 API 地址 {}: {}", order_api_url, e)))?;

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(AppError::Config(format!("订单 API 地址缺少主机名: {}", order_api_url)));
            }
        };

        Ok(Self {
            http,
            url,
            host,
            authorization: format!("Basic {}", keys.basic_auth_value()),
        })
    }
}

#[async_trait]
impl OrderSource for ShipStationClient {
    async fn fetch_orders(&self) -> AppResult<OrderList> {
        let endpoint = self.url.as_str();
        debug!("请求订单: {}", endpoint);

        let response = self
            .http
            .get(self.url.clone())
            .header(HOST, &self.host)
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await
            .map_err(|e| AppError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::transport(endpoint, e))?;

        let list: OrderList = serde_json::from_slice(&body).map_err(|e| AppError::decode(endpoint, e))?;
        info!("✓ 已连接 ShipStation API");

        if list.orders.is_empty() {
            return Err(AppError::EmptyResult {
                endpoint: endpoint.to_string(),
            });
        }

        if list.pages.unwrap_or(1) > 1 {
            warn!(
                "⚠️ 订单共 {} 页，只处理第 {} 页 ({} 个订单，共 {} 个)",
                list.pages.unwrap_or(1),
                list.page.unwrap_or(1),
                list.orders.len(),
                list.total.unwrap_or(0)
            );
        }

        info!("✓ 已拉取 {} 个订单", list.orders.len());
        Ok(list)
    }
}
