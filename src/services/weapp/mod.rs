//! 微信小程序数据分析服务
//!
//! 对接 https://api.weixin.qq.com/datacube 下的访问留存接口
//!
//! ## 主要功能
//! - 日留存：getweanalysisappiddailyretaininfo
//! - 周留存：getweanalysisappidweeklyretaininfo
//! - 月留存：getweanalysisappidmonthlyretaininfo

mod common;
mod retain;

pub use common::WEAPP_BASE_URL;
pub use retain::RetainService;

#[cfg(test)]
pub(crate) mod mock;
