//! Send-schedule estimation over a campaign's sequence steps
//!
//! `current_sequence_step` on an operations row is the number of the step
//! most recently sent (0 before the first send). Step numbers need not be
//! contiguous.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::SequenceStep;

/// Estimated send time of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledSend {
    pub step_number: i64,
    pub send_at: DateTime<Utc>,
}

/// Result of advancing a recipient after a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAdvance {
    /// Step now recorded as sent
    pub current_step: i64,
    /// When the following step is due; `None` once the sequence is finished
    pub next_contact: Option<DateTime<Utc>>,
}

fn ordered(steps: &[SequenceStep]) -> Vec<&SequenceStep> {
    let mut sorted: Vec<&SequenceStep> = steps.iter().collect();
    sorted.sort_by_key(|s| s.step_number);
    sorted
}

fn step_after(steps: &[SequenceStep], step_number: i64) -> Option<&SequenceStep> {
    ordered(steps)
        .into_iter()
        .find(|s| s.step_number > step_number)
}

/// Estimated send time of every step for a recipient enrolled at `start`,
/// assuming each email goes out exactly when due
pub fn estimate_send_schedule(steps: &[SequenceStep], start: DateTime<Utc>) -> Vec<ScheduledSend> {
    let mut at = start;
    ordered(steps)
        .into_iter()
        .map(|step| {
            at += Duration::days(step.delay_days);
            ScheduledSend {
                step_number: step.step_number,
                send_at: at,
            }
        })
        .collect()
}

/// When the first step is due for a recipient enrolled at `enrolled_at`
pub fn first_contact_at(steps: &[SequenceStep], enrolled_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    step_after(steps, 0).map(|s| enrolled_at + Duration::days(s.delay_days))
}

/// Advance past the pending step, which was sent at `sent_at`
pub fn advance_after_send(
    steps: &[SequenceStep],
    current_step: i64,
    sent_at: DateTime<Utc>,
) -> SequenceAdvance {
    let sent_step = step_after(steps, current_step)
        .map(|s| s.step_number)
        .unwrap_or(current_step + 1);
    let next_contact =
        step_after(steps, sent_step).map(|next| sent_at + Duration::days(next.delay_days));

    SequenceAdvance {
        current_step: sent_step,
        next_contact,
    }
}
