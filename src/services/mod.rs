//! 业务逻辑服务模块
//! 
//! 封装数据获取和处理逻辑

pub mod weapp; // 微信小程序数据分析服务
