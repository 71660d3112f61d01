//! 留存接口处理器
//!
//! ## API 列表
//! - GET /retain/daily   - 日留存
//! - GET /retain/weekly  - 周留存
//! - GET /retain/monthly - 月留存
//!
//! 查询参数 begin_date、end_date（yyyymmdd），
//! 微信 access_token 通过 X-Access-Token 请求头或 access_token 查询参数传入

use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::models::{ApiResponse, RetainPeriod, RetainQuery, RetainReport};
use crate::services::weapp::RetainService;

/// 传递微信 access_token 的请求头
pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

fn access_token<'a>(req: &'a HttpRequest, query: &'a RetainQuery) -> Option<&'a str> {
    req.headers()
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .or(query.access_token.as_deref())
        .filter(|token| !token.is_empty())
}

/// 获取用户访问小程序留存
///
/// GET /api/v1/retain/{period}
pub async fn get_retain(
    req: HttpRequest,
    path: web::Path<RetainPeriod>,
    query: web::Query<RetainQuery>,
    service: web::Data<RetainService>,
) -> Result<HttpResponse> {
    let period = path.into_inner();

    let Some(token) = access_token(&req, &query) else {
        let response = ApiResponse::<RetainReport>::error("缺少 access_token");
        return Ok(HttpResponse::BadRequest().json(response));
    };

    if let Err(e) = query.validate() {
        let response = ApiResponse::<RetainReport>::error(e.to_string());
        return Ok(HttpResponse::BadRequest().json(response));
    }

    let (begin, end) = (query.begin_date.as_str(), query.end_date.as_str());
    let result = match period {
        RetainPeriod::Daily => service.get_daily_retain(token, begin, end).await,
        RetainPeriod::Weekly => service.get_weekly_retain(token, begin, end).await,
        RetainPeriod::Monthly => service.get_monthly_retain(token, begin, end).await,
    };

    match result {
        Ok(res) if res.is_ok() => {
            let response = ApiResponse::success(RetainReport::new(period, res));
            Ok(HttpResponse::Ok().json(response))
        }
        Ok(res) => {
            log::warn!("微信接口返回错误: {} {}", res.errcode, res.errmsg);
            let response = ApiResponse::<RetainReport>::error(format!(
                "微信接口返回错误 {}: {}",
                res.errcode, res.errmsg
            ));
            Ok(HttpResponse::BadGateway().json(response))
        }
        Err(e) => {
            log::error!("获取{:?}留存数据失败: {:#}", period, e);
            let response = ApiResponse::<RetainReport>::error(e.to_string());
            Ok(HttpResponse::BadGateway().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/retain/{period}", web::get().to(get_retain));
}
