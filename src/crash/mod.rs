pub mod log_sink;
pub mod manager;

pub use log_sink::CrashLogSink;
pub use manager::{CrashOutputManager, CrashReport, CRASH_DATA_DIR, CRASH_LOG_DIR};
