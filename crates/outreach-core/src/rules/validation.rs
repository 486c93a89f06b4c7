use crate::errors::{OutreachError, Result};
use crate::model::{ActiveState, MemberSource, TargetList};

/// Trimmed value of a required text field
///
/// # Errors
///
/// `BlankField` when the value is empty or whitespace.
pub fn require_non_blank(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OutreachError::BlankField {
            field: field.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Reject members that carry no data at all
///
/// # Errors
///
/// `EmptyMember` naming the first offending index.
pub fn validate_members(members: &[MemberSource]) -> Result<()> {
    match members.iter().position(MemberSource::is_blank) {
        Some(index) => Err(OutreachError::EmptyMember { index }),
        None => Ok(()),
    }
}

/// # Errors
///
/// `InvalidSequenceStep` for a step number below 1, a negative delay or a
/// blank subject.
pub fn validate_sequence_step(step_number: i64, delay_days: i64, subject: &str) -> Result<()> {
    let reason = if step_number < 1 {
        Some("step number must be at least 1")
    } else if delay_days < 0 {
        Some("delay must not be negative")
    } else if subject.trim().is_empty() {
        Some("subject must not be blank")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(OutreachError::InvalidSequenceStep {
            step_number,
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Guard for destructive list changes (`action` reads as "cannot be <action>")
///
/// # Errors
///
/// `ListInUse` once the list has been enrolled into any campaign.
pub fn ensure_list_mutable(list: &TargetList, action: &str) -> Result<()> {
    if list.used_in_campaigns {
        return Err(OutreachError::ListInUse {
            list_id: list.id.clone(),
            action: action.to_string(),
        });
    }
    Ok(())
}

/// # Errors
///
/// `Unsubscribed` when the recipient reached the terminal state.
pub fn ensure_contactable(enrollment_profile_id: &str, state: ActiveState) -> Result<()> {
    if state.is_terminal() {
        return Err(OutreachError::Unsubscribed {
            enrollment_profile_id: enrollment_profile_id.to_string(),
        });
    }
    Ok(())
}
