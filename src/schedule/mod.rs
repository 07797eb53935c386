//! # Schedule Module
//!
//! This module curates raw (text, delay) rows into an executable
//! transmission schedule and runs it over the guarded channel.

pub mod runner;

use std::time::Duration;

use regex::Regex;

use crate::error::{RemoteSerialError, Result};

/// Upper bound on a single step delay, in seconds.
pub const MAX_STEP_DELAY_SECS: u64 = 60;

/// One curated schedule step: text to transmit after waiting `delay`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleStep {
    pub text: String,
    pub delay: Duration,
}

/// Curate raw (text, delay) rows into an executable schedule.
///
/// Trailing rows that are empty in both columns are dropped. The remaining
/// rows must be fully populated: one to six alphanumeric characters of
/// text, and a delay of at most two digits bounded to
/// [`MAX_STEP_DELAY_SECS`] seconds.
pub fn curate_rows(rows: &[(String, String)]) -> Result<Vec<ScheduleStep>> {
    let text_pattern = Regex::new(r"^[a-zA-Z0-9]{1,6}$").expect("Invalid regex pattern");
    let delay_pattern = Regex::new(r"^[0-9]{1,2}$").expect("Invalid regex pattern");

    let mut rows = rows.to_vec();
    while rows
        .last()
        .is_some_and(|(text, delay)| text.is_empty() && delay.is_empty())
    {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(RemoteSerialError::schedule("empty schedule"));
    }

    let mut steps = Vec::with_capacity(rows.len());
    for (text, delay) in &rows {
        if text.is_empty() || delay.is_empty() {
            return Err(RemoteSerialError::schedule("missing schedule data"));
        }
        if !text_pattern.is_match(text) {
            return Err(RemoteSerialError::schedule(format!(
                "text value '{text}' must be 1-6 alphanumeric characters"
            )));
        }
        if !delay_pattern.is_match(delay) {
            return Err(RemoteSerialError::schedule(format!(
                "delay value '{delay}' must be a whole number of seconds"
            )));
        }
        let secs: u64 = delay
            .parse()
            .map_err(|_| RemoteSerialError::schedule(format!("delay value '{delay}' is not a number")))?;
        if secs > MAX_STEP_DELAY_SECS {
            return Err(RemoteSerialError::schedule(format!(
                "delay value '{delay}' exceeds {MAX_STEP_DELAY_SECS} seconds"
            )));
        }
        steps.push(ScheduleStep {
            text: text.clone(),
            delay: Duration::from_secs(secs),
        });
    }
    Ok(steps)
}
