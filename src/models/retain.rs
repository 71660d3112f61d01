//! 小程序访问留存数据模型
//!
//! 对应微信 datacube 留存接口的请求与返回结构

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 留存统计粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetainPeriod {
    /// 日留存
    Daily,
    /// 周留存
    Weekly,
    /// 月留存
    Monthly,
}

/// 用户留存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitUv {
    /// 标识，0 表示当期，1 表示 1 期后，依此类推
    pub key: u8,
    /// key=0 时为新增/活跃用户数，key>0 时为留存用户数
    pub value: u32,
}

/// 留存接口请求参数
#[derive(Debug, Clone, Serialize)]
pub struct RetainParams<'a> {
    /// 开始日期，格式 yyyymmdd
    pub begin_date: &'a str,
    /// 结束日期，格式 yyyymmdd
    pub end_date: &'a str,
}

/// 留存接口返回数据
///
/// errcode/errmsg 为微信接口的通用错误字段，成功时通常不返回
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetainResponse {
    /// 错误码，0 表示成功
    #[serde(default)]
    pub errcode: i64,
    /// 错误信息
    #[serde(default)]
    pub errmsg: String,
    /// 时间：月格式 yyyymm，周格式 yyyymmdd-yyyymmdd，日格式 yyyymmdd
    #[serde(default)]
    pub ref_date: String,
    /// 活跃用户留存
    #[serde(default)]
    pub visit_uv: Vec<VisitUv>,
    /// 新增用户留存
    #[serde(default)]
    pub visit_uv_new: Vec<VisitUv>,
}

/// 留存率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRate {
    /// 与 VisitUv.key 一致
    pub key: u8,
    /// 相对 key=0 的比例
    pub rate: f64,
}

impl RetainResponse {
    /// 微信接口是否返回成功
    pub fn is_ok(&self) -> bool {
        self.errcode == 0
    }

    /// 活跃用户留存率
    pub fn visit_uv_rates(&self) -> Vec<RetentionRate> {
        retention_rates(&self.visit_uv)
    }

    /// 新增用户留存率
    pub fn visit_uv_new_rates(&self) -> Vec<RetentionRate> {
        retention_rates(&self.visit_uv_new)
    }
}

/// 以 key=0 的用户数为基数计算各期留存率，基数缺失或为 0 时返回空
fn retention_rates(series: &[VisitUv]) -> Vec<RetentionRate> {
    let base = match series.iter().find(|uv| uv.key == 0) {
        Some(uv) if uv.value > 0 => uv.value as f64,
        _ => return Vec::new(),
    };

    let mut rates: Vec<RetentionRate> = series
        .iter()
        .map(|uv| RetentionRate {
            key: uv.key,
            rate: uv.value as f64 / base,
        })
        .collect();
    rates.sort_by_key(|r| r.key);
    rates
}

/// 留存查询参数
#[derive(Debug, Deserialize)]
pub struct RetainQuery {
    /// 开始日期（YYYYMMDD）
    pub begin_date: String,
    /// 结束日期（YYYYMMDD）
    pub end_date: String,
    /// 接口调用凭证，优先使用 X-Access-Token 请求头
    pub access_token: Option<String>,
}

impl RetainQuery {
    /// 校验日期格式及先后顺序
    pub fn validate(&self) -> Result<()> {
        let begin = parse_date(&self.begin_date)?;
        let end = parse_date(&self.end_date)?;
        if begin > end {
            return Err(anyhow!(
                "开始日期 {} 晚于结束日期 {}",
                self.begin_date,
                self.end_date
            ));
        }
        Ok(())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!("日期格式应为 yyyymmdd: {}", s));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|e| anyhow!("无效日期 {}: {}", s, e))
}

/// 留存报告（透传微信返回并附带留存率）
#[derive(Debug, Serialize, Deserialize)]
pub struct RetainReport {
    /// 统计粒度
    pub period: RetainPeriod,
    /// 时间
    pub ref_date: String,
    /// 活跃用户留存
    pub visit_uv: Vec<VisitUv>,
    /// 新增用户留存
    pub visit_uv_new: Vec<VisitUv>,
    /// 活跃用户留存率
    pub visit_uv_rate: Vec<RetentionRate>,
    /// 新增用户留存率
    pub visit_uv_new_rate: Vec<RetentionRate>,
}

impl RetainReport {
    pub fn new(period: RetainPeriod, response: RetainResponse) -> Self {
        let visit_uv_rate = response.visit_uv_rates();
        let visit_uv_new_rate = response.visit_uv_new_rates();
        Self {
            period,
            ref_date: response.ref_date,
            visit_uv: response.visit_uv,
            visit_uv_new: response.visit_uv_new,
            visit_uv_rate,
            visit_uv_new_rate,
        }
    }
}
