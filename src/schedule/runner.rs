//! Schedule execution over the guarded channel, with optional crash capture.

use std::fmt;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::crash::manager::{CrashOutputManager, CrashReport};
use crate::error::{render_error_chain, RemoteSerialError, Result};
use crate::output::OutputFile;
use crate::schedule::ScheduleStep;
use crate::serial::guard::MutexSerial;
use crate::serial::port::Channel;

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub steps: usize,
    pub elapsed: Duration,
}

/// Operator-facing record of where the crash artifacts landed.
#[derive(Debug)]
pub struct CrashNotice {
    pub log_path: PathBuf,
    pub data_path: PathBuf,
}

impl fmt::Display for CrashNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "An unexpected failure occurred. Please see:\n\n\"{}\"\n\nand\n\n\"{}\"",
            self.log_path.display(),
            self.data_path.display()
        )
    }
}

/// Result of a crash-capturing run.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The run failed; both crash artifacts were captured.
    Crashed {
        error: RemoteSerialError,
        notice: CrashNotice,
    },
}

/// Execute `schedule` step by step on the calling thread.
///
/// Each step sleeps its delay, transmits its text under the channel guard,
/// and appends a record to `output`. The channel is released (and closed)
/// between steps. `status` receives one progress line per step.
pub fn run_schedule<C: Channel>(
    serial: &MutexSerial<C>,
    schedule: &[ScheduleStep],
    output: &OutputFile,
    status: &mut dyn FnMut(&str),
) -> Result<RunSummary> {
    let started = Instant::now();
    for (index, step) in schedule.iter().enumerate() {
        thread::sleep(step.delay);
        {
            let mut guard = serial.acquire()?;
            guard.send(step.text.as_bytes())?;
        }
        output.append_record(&step.text)?;
        status(&format!(
            "step {}/{}: sent '{}'",
            index + 1,
            schedule.len(),
            step.text
        ));
    }

    let summary = RunSummary {
        steps: schedule.len(),
        elapsed: started.elapsed(),
    };
    info!(
        "schedule complete: {} steps in {:.3}s",
        summary.steps,
        summary.elapsed.as_secs_f64()
    );
    Ok(summary)
}

/// Execute a schedule and translate an unhandled failure into both crash
/// artifacts.
///
/// A step failure yields [`RunOutcome::Crashed`] carrying the failure and a
/// [`CrashNotice`] naming the captured crash log and the relocated output
/// file. Failures of the crash handling itself propagate as errors; they
/// are never swallowed or retried.
pub fn run_schedule_with_capture<C: Channel>(
    serial: &MutexSerial<C>,
    schedule: &[ScheduleStep],
    output: &OutputFile,
    status: &mut dyn FnMut(&str),
    crash: &CrashOutputManager,
) -> Result<RunOutcome> {
    match run_schedule(serial, schedule, output, status) {
        Ok(summary) => Ok(RunOutcome::Completed(summary)),
        Err(error) => {
            warn!("schedule run failed: {error}");
            let rendered = render_error_chain(&error);
            let log_path = crash.record_crash_log(output.name(), CrashReport::Captured(&rendered))?;
            let data_path = crash.record_crash_data(output.name(), output.path())?;
            Ok(RunOutcome::Crashed {
                error,
                notice: CrashNotice {
                    log_path,
                    data_path,
                },
            })
        }
    }
}
