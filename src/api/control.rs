use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::error::{MonitorError, Result};
use crate::services::MonitorEngine;
use crate::state::{lock_state, AppState};

/// 启动请求，缺省字段取当前加载的配置
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub process_name: Option<String>,
    /// 数字或字符串均可，字符串按界面输入解析
    pub interval: Option<serde_json::Value>,
}

pub async fn start(
    data: web::Data<AppState>,
    req: Option<web::Json<StartRequest>>,
) -> impl Responder {
    let req = req.map(|r| r.into_inner()).unwrap_or_default();

    transition(&data, |engine| {
        let defaults = engine.config().clone();
        let name = req.process_name.unwrap_or(defaults.process_name);
        let interval = match req.interval {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => defaults.interval_ms.to_string(),
        };

        log::info!("Start requested: process='{}' interval='{}'", name, interval);
        engine.start_from_input(&name, &interval)
    })
}

pub async fn toggle(data: web::Data<AppState>) -> impl Responder {
    transition(&data, MonitorEngine::toggle)
}

pub async fn stop(data: web::Data<AppState>) -> impl Responder {
    transition(&data, MonitorEngine::stop)
}

pub async fn reset(data: web::Data<AppState>) -> impl Responder {
    transition(&data, |engine| {
        engine.reset();
        Ok(())
    })
}

pub async fn status(data: web::Data<AppState>) -> impl Responder {
    let inner = lock_state(&data);
    HttpResponse::Ok().json(snapshot(&inner.engine))
}

pub async fn history(data: web::Data<AppState>) -> impl Responder {
    let inner = lock_state(&data);
    let history = inner.engine.history();
    HttpResponse::Ok().json(serde_json::json!({
        "process_name": inner.engine.target().process_name,
        "capacity": history.capacity(),
        "samples": history.samples(),
    }))
}

/// 在锁内执行状态转移，然后让定时任务跟上新状态
fn transition<F>(data: &AppState, op: F) -> HttpResponse
where
    F: FnOnce(&mut MonitorEngine) -> Result<()>,
{
    let mut guard = lock_state(data);
    let inner = &mut *guard;

    let result = op(&mut inner.engine);
    inner.scheduler.sync(&inner.engine, data);

    let body = snapshot(&inner.engine);
    match result {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(e @ MonitorError::Validation(_)) => HttpResponse::BadRequest().json(error_body(&e, body)),
        Err(e @ MonitorError::InvalidTransition { .. }) => {
            HttpResponse::Conflict().json(error_body(&e, body))
        }
        Err(e) => HttpResponse::InternalServerError().json(error_body(&e, body)),
    }
}

fn snapshot(engine: &MonitorEngine) -> serde_json::Value {
    serde_json::json!({
        "state": engine.state(),
        "process_name": engine.config().process_name,
        "interval_ms": engine.config().interval_ms,
        "pid": engine.target().pid(),
        "samples": engine.history().len(),
        "status": engine.last_status(),
    })
}

fn error_body(err: &MonitorError, mut body: serde_json::Value) -> serde_json::Value {
    body["error"] = serde_json::Value::String(err.to_string());
    body
}
