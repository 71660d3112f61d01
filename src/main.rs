//! 微信小程序留存数据后端服务
//!
//! 转发小程序访问留存（日/周/月）查询到微信 datacube 接口，
//! 以统一格式返回并附带留存率

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::weapp::RetainService;

fn to_io_error(e: anyhow::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:#}", e))
}

/// 应用程序入口
#[actix_web::main]
async fn main() -> io::Result<()> {
    let (config, source) = AppConfig::load().map_err(to_io_error)?;

    // RUST_LOG 优先，否则使用配置中的日志级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &source {
        Some(path) => log::info!("从 {} 加载配置成功", path.display()),
        None => log::info!("使用默认配置"),
    }

    let service = web::Data::new(RetainService::from_config(&config).map_err(to_io_error)?);
    let api_key = config.api.api_key.clone();
    if api_key.is_empty() {
        log::warn!("未配置 API Key，接口认证已关闭");
    }

    log::info!(
        "启动小程序留存服务 {}，微信接口: {}",
        config.bind_addr(),
        config.weapp.base_url
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(ApiKeyMiddleware::new(api_key.clone()))  // API Key 认证
            .wrap(Logger::new(r#"%a "%U" %s %b %T"#))  // 请求日志（不含查询参数）
            .app_data(service.clone())
            .configure(handlers::config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
