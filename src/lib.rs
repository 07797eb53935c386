//! # Remote Serial
//!
//! Thread-safe serial channel access with crash artifact capture.
//!
//! This crate guards a serial communication channel behind a mutual
//! exclusion discipline and, when an operation fails unexpectedly, captures
//! durable crash artifacts an operator can find afterwards.
//!
//! ## Features
//!
//! - **Exclusive Channel Guard**: At most one logical operation holds the
//!   channel at a time, across OS threads; the channel is opened lazily on
//!   acquisition and always left closed on release.
//! - **Crash Artifact Capture**: An unhandled failure produces a crash log
//!   in a dedicated log directory and relocates the in-flight output file
//!   into a dedicated crash-data directory.
//! - **Transmission Schedules**: Curated (text, delay) schedules executed
//!   step by step over the guarded channel, with progress callbacks.
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`serial`]: The channel abstraction, serial device, and exclusive guard
//! - [`crash`]: Crash log sink and crash artifact manager
//! - [`schedule`]: Schedule curation and the crash-capturing runner
//! - [`output`]: The working output file the runner records into
//! - [`error`]: Custom error types for the crate

pub mod crash;
pub mod error;
pub mod output;
pub mod schedule;
pub mod serial;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::crash::log_sink::CrashLogSink;
    pub use crate::crash::manager::{CrashOutputManager, CrashReport};
    pub use crate::error::*;
    pub use crate::output::OutputFile;
    pub use crate::schedule::runner::{
        run_schedule, run_schedule_with_capture, CrashNotice, RunOutcome, RunSummary,
    };
    pub use crate::schedule::{curate_rows, ScheduleStep};
    pub use crate::serial::guard::{ChannelGuard, MutexSerial};
    pub use crate::serial::port::{Channel, PortSettings, SerialDevice};
}
