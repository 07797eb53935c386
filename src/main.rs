use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use log::warn;
use remote_serial::prelude::*;
use remote_serial::serial::port::{list_port_names, COMMON_BAUD_RATES};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() == 2 && args[1] == "list" {
        for name in list_port_names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let [_, port, baud, schedule_file] = args.as_slice() else {
        eprintln!("usage: remote_serial <port> <baud> <schedule-file>");
        eprintln!("       remote_serial list");
        return ExitCode::FAILURE;
    };

    match run(port, baud, Path::new(schedule_file)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(port: &str, baud: &str, schedule_file: &Path) -> Result<ExitCode> {
    let baud: u32 = baud
        .parse()
        .map_err(|_| RemoteSerialError::invalid_config(format!("invalid baud rate '{baud}'")))?;
    if !COMMON_BAUD_RATES.contains(&baud) {
        warn!("uncommon baud rate {baud}");
    }

    let rows = load_rows(schedule_file)?;
    let steps = curate_rows(&rows)?;

    let serial = MutexSerial::from_settings(PortSettings::new(port, baud));
    let output = OutputFile::create(&env::current_dir()?, "run_output.txt")?;
    let crash = CrashOutputManager::new(Arc::new(CrashLogSink::new()))?;

    let mut status = |line: &str| println!("{line}");
    match run_schedule_with_capture(&serial, &steps, &output, &mut status, &crash)? {
        RunOutcome::Completed(summary) => {
            println!(
                "complete: {} steps in {:.3}s",
                summary.steps,
                summary.elapsed.as_secs_f64()
            );
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Crashed { error, notice } => {
            eprintln!("{error}");
            eprintln!("{notice}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Load raw schedule rows from a `text,delay` file, one row per line.
fn load_rows(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| match line.split_once(',') {
            Some((text, delay)) => (text.trim().to_string(), delay.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        })
        .collect())
}
