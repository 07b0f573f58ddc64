use actix_web::{web, App, HttpServer};
use clap::Parser;

use process_monitor::api;
use process_monitor::cli::CommandArgs;
use process_monitor::services::{
    Collaborators, History, JsonConfigStore, JsonReportExporter, LogStatusReporter,
    MonitorEngine, SysinfoLocator,
};
use process_monitor::state::{lock_state, new_state, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandArgs::parse();
    let bind_address = format!("{}:{}", args.address, args.port);

    let locator = SysinfoLocator::new();
    log::info!("🔄 Process locator ready ({} logical cores)", locator.logical_cores());

    let collaborators = Collaborators {
        locator: Box::new(locator),
        config_store: Box::new(JsonConfigStore::new(&args.config_file)),
        reporter: Box::new(LogStatusReporter::default()),
        exporter: Box::new(JsonReportExporter::new(&args.report_dir)),
    };
    let history = History::with_capacity(args.max_samples);
    let engine = MonitorEngine::with_history(collaborators, history);
    let state = new_state(engine);

    if let Some(process) = &args.process {
        autostart(&state, process, args.interval.as_deref());
    }

    print_banner(&args);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
        .bind(&bind_address)?
        .run()
        .await
}

/// 命令行指定了进程时直接开始监控，间隔缺省取配置文件中的值
fn autostart(state: &AppState, process: &str, interval: Option<&str>) {
    let mut guard = lock_state(state);
    let inner = &mut *guard;

    let interval = interval
        .map(str::to_string)
        .unwrap_or_else(|| inner.engine.config().interval_ms.to_string());

    match inner.engine.start_from_input(process, &interval) {
        Ok(()) => log::info!("✅ Monitoring '{}' from command line", process),
        Err(e) => log::error!("❌ Failed to start monitoring '{}': {}", process, e),
    }
    inner.scheduler.sync(&inner.engine, state);
}

fn print_banner(args: &CommandArgs) {
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║      Process Monitor v{:<36}║", env!("CARGO_PKG_VERSION"));
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🚀 Server starting on http://{}:{}", args.address, args.port);
    println!();
    println!("📋 Available endpoints:");
    println!("  POST   /api/monitor/start      - Start monitoring a process");
    println!("  POST   /api/monitor/toggle     - Pause / resume");
    println!("  POST   /api/monitor/stop       - Stop and export report");
    println!("  POST   /api/monitor/reset      - Clear history and reload config");
    println!("  GET    /api/monitor/status     - Current state and status text");
    println!("  GET    /api/monitor/history    - Retained samples");
    println!("  GET    /metrics                - Prometheus metrics");
    println!("  GET    /health                 - Health check");
    println!();
    println!("💡 Config file: {}", args.config_file.display());
    println!("💡 Reports:     {}", args.report_dir.display());
    println!("═══════════════════════════════════════════════════════════");
}
