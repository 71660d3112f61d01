//! 用户访问小程序留存

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;

use crate::config::AppConfig;
use crate::models::{RetainParams, RetainPeriod, RetainResponse};

use super::common::{retain_api, token_api};

/// 留存数据服务
///
/// 三个粒度的接口仅路径不同，统一由 get_retain 完成
/// 拼接地址、序列化参数、POST 请求和解析返回
#[derive(Debug, Clone)]
pub struct RetainService {
    /// HTTP 客户端
    client: Client,
    /// 微信接口域名，如 https://api.weixin.qq.com
    base_url: String,
}

impl RetainService {
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 按配置中的超时时间和接口域名创建服务
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.weapp.base_url.clone()))
    }

    /// 获取用户访问小程序月留存
    ///
    /// - begin: 开始日期，为自然月第一天，格式 yyyymmdd
    /// - end: 结束日期，为自然月最后一天，限定查询一个月数据
    pub async fn get_monthly_retain(
        &self,
        access_token: &str,
        begin: &str,
        end: &str,
    ) -> Result<RetainResponse> {
        self.get_retain(RetainPeriod::Monthly, access_token, begin, end)
            .await
    }

    /// 获取用户访问小程序周留存
    ///
    /// - begin: 开始日期，为周一日期，格式 yyyymmdd
    /// - end: 结束日期，为周日日期，限定查询一周数据
    pub async fn get_weekly_retain(
        &self,
        access_token: &str,
        begin: &str,
        end: &str,
    ) -> Result<RetainResponse> {
        self.get_retain(RetainPeriod::Weekly, access_token, begin, end)
            .await
    }

    /// 获取用户访问小程序日留存
    ///
    /// - begin: 开始日期，格式 yyyymmdd
    /// - end: 结束日期，限定查询 1 天数据，最大值为昨日
    pub async fn get_daily_retain(
        &self,
        access_token: &str,
        begin: &str,
        end: &str,
    ) -> Result<RetainResponse> {
        self.get_retain(RetainPeriod::Daily, access_token, begin, end)
            .await
    }

    /// 请求留存接口
    ///
    /// 微信返回的 errcode 不在此处处理，原样交给调用方
    async fn get_retain(
        &self,
        period: RetainPeriod,
        access_token: &str,
        begin: &str,
        end: &str,
    ) -> Result<RetainResponse> {
        let api = format!("{}{}", self.base_url, retain_api(period));
        let url = token_api(&api, access_token)?;

        let params = RetainParams {
            begin_date: begin,
            end_date: end,
        };
        let raw = serde_json::to_vec(&params)?;

        log::info!("📡 请求{:?}留存数据 URL: {}", period, api);
        log::debug!("请求参数: {}", String::from_utf8_lossy(&raw));

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(raw)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取留存数据失败: {}", response.status()));
        }

        let text = response.text().await?;
        let preview: String = text.chars().take(300).collect();
        log::debug!("📥 原始响应数据: {}", preview);

        let res: RetainResponse = serde_json::from_str(&text)?;
        Ok(res)
    }
}
