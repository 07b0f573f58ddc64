pub mod config_store;
pub mod engine;
pub mod history;
pub mod process_locator;
pub mod report_exporter;
pub mod scheduler;
pub mod status;

pub use config_store::{ConfigStore, JsonConfigStore};
pub use engine::{Collaborators, MonitorEngine, TickOutcome};
pub use history::{History, MAX_SAMPLES};
pub use process_locator::{ProcessLocator, SysinfoLocator};
pub use report_exporter::{ChartExporter, JsonReportExporter};
pub use scheduler::TickScheduler;
pub use status::{LogStatusReporter, StatusReporter};
