//! 测试用的微信接口模拟服务

use std::collections::HashMap;

use actix_web::{dev::ServerHandle, http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;

use super::common::{GET_DAILY_RETAIN_API, GET_MONTHLY_RETAIN_API, GET_WEEKLY_RETAIN_API};

/// 模拟服务接受的 access_token
pub const MOCK_TOKEN: &str = "MOCK_ACCESS_TOKEN";

fn wx_error(errcode: i64, errmsg: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "errcode": errcode, "errmsg": errmsg }))
}

/// 校验 access_token、Content-Type 和请求体后返回固定数据，
/// ref_date 按接口粒度由请求日期生成
async fn mock_retain(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
) -> HttpResponse {
    if query.get("access_token").map(String::as_str) != Some(MOCK_TOKEN) {
        return wx_error(40001, "invalid credential");
    }

    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        == Some("application/json");
    let params: HashMap<String, String> = match serde_json::from_slice(&body) {
        Ok(params) if is_json => params,
        _ => return wx_error(47001, "data format error"),
    };

    let (begin, end) = match (params.get("begin_date"), params.get("end_date")) {
        (Some(begin), Some(end)) if params.len() == 2 && begin.len() == 8 => (begin, end),
        _ => return wx_error(47001, "data format error"),
    };

    let ref_date = match req.path() {
        GET_MONTHLY_RETAIN_API => begin[..6].to_string(),
        GET_WEEKLY_RETAIN_API => format!("{}-{}", begin, end),
        _ => begin.clone(),
    };

    HttpResponse::Ok().json(json!({
        "ref_date": ref_date,
        "visit_uv_new": [{ "key": 0, "value": 346249 }],
        "visit_uv": [{ "key": 0, "value": 346249 }, { "key": 1, "value": 101352 }]
    }))
}

/// 在随机端口启动模拟服务，返回 (base_url, handle)
///
/// - `{base_url}/datacube/...`：正常接口
/// - `{base_url}/broken/datacube/...`：返回 HTML
/// - `{base_url}/fail/datacube/...`：返回 500
pub async fn start_mock_server() -> (String, ServerHandle) {
    let server = HttpServer::new(|| {
        App::new()
            .route(GET_MONTHLY_RETAIN_API, web::post().to(mock_retain))
            .route(GET_WEEKLY_RETAIN_API, web::post().to(mock_retain))
            .route(GET_DAILY_RETAIN_API, web::post().to(mock_retain))
            .route(
                "/broken/datacube/{api}",
                web::post().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html")
                        .body("<html>system busy</html>")
                }),
            )
            .route(
                "/fail/datacube/{api}",
                web::post().to(|| async { HttpResponse::InternalServerError().finish() }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock server");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}", addr), handle)
}
