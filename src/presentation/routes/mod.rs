// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{
    extract_handler, hearing_handler, run_log_handler, status_handler,
};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/extract/live-status",
            post(extract_handler::trigger_live_status),
        )
        .route(
            "/v1/extract/advocate",
            post(extract_handler::trigger_advocate_search),
        )
        .route("/v1/run-logs", get(run_log_handler::list_run_logs))
        .route("/v1/hearings", get(hearing_handler::list_hearings))
        .route("/v1/live-status", get(status_handler::list_statuses));

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
