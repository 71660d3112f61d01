//! 公共常量和辅助函数

use anyhow::Result;
use url::Url;

use crate::models::RetainPeriod;

/// 微信接口域名
pub const WEAPP_BASE_URL: &str = "https://api.weixin.qq.com";

// ==================== 访问留存 API ====================

/// 获取用户访问小程序月留存
pub const GET_MONTHLY_RETAIN_API: &str = "/datacube/getweanalysisappidmonthlyretaininfo";
/// 获取用户访问小程序周留存
pub const GET_WEEKLY_RETAIN_API: &str = "/datacube/getweanalysisappidweeklyretaininfo";
/// 获取用户访问小程序日留存
pub const GET_DAILY_RETAIN_API: &str = "/datacube/getweanalysisappiddailyretaininfo";

/// 统计粒度对应的接口路径
pub fn retain_api(period: RetainPeriod) -> &'static str {
    match period {
        RetainPeriod::Daily => GET_DAILY_RETAIN_API,
        RetainPeriod::Weekly => GET_WEEKLY_RETAIN_API,
        RetainPeriod::Monthly => GET_MONTHLY_RETAIN_API,
    }
}

/// 在接口地址上附加 access_token 参数，保留原有查询参数
pub fn token_api(api: &str, access_token: &str) -> Result<Url> {
    let mut url = Url::parse(api)?;
    url.query_pairs_mut().append_pair("access_token", access_token);
    Ok(url)
}
