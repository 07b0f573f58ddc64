pub mod control;
pub mod metrics;

pub use control::{history, reset, start, status, stop, toggle};
pub use metrics::get_metrics;

use actix_web::{web, HttpResponse, Responder};

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

/// 注册全部路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/monitor/start", web::post().to(start))
        .route("/api/monitor/toggle", web::post().to(toggle))
        .route("/api/monitor/stop", web::post().to(stop))
        .route("/api/monitor/reset", web::post().to(reset))
        .route("/api/monitor/status", web::get().to(status))
        .route("/api/monitor/history", web::get().to(history))
        .route("/metrics", web::get().to(get_metrics))
        .route("/health", web::get().to(health));
}
