//! Field resolution for enrollment snapshots
//!
//! Fallback chain per field: normalized column (non-blank) → JSON blob
//! (aliases in priority order) → `None`. `full_name` then falls back to
//! "first last", then to the empty string.

use serde_json::Value;

use crate::model::{MemberSource, ProfileField, ProfileSnapshot};

/// Resolve one personalization field of a member
pub fn resolve_field(source: &MemberSource, field: ProfileField) -> Option<String> {
    match source {
        MemberSource::Normalized {
            fields,
            additional_data,
        } => fields
            .get(field)
            .and_then(non_blank)
            .or_else(|| additional_data.as_ref().and_then(|blob| from_blob(blob, field))),
        MemberSource::Legacy(blob) => from_blob(blob, field),
    }
}

/// Resolve every field of a member into a by-value snapshot
pub fn snapshot_member(source: &MemberSource) -> ProfileSnapshot {
    let get = |field| resolve_field(source, field);

    let first_name = get(ProfileField::FirstName);
    let last_name = get(ProfileField::LastName);
    let full_name = get(ProfileField::FullName)
        .or_else(|| join_name(first_name.as_deref(), last_name.as_deref()))
        .unwrap_or_default();

    ProfileSnapshot {
        full_name,
        first_name,
        last_name,
        email: get(ProfileField::Email),
        title: get(ProfileField::Title),
        company: get(ProfileField::Company),
        company_domain: get(ProfileField::CompanyDomain),
        location: get(ProfileField::Location),
        linkedin_url: get(ProfileField::LinkedinUrl),
        enrichment: source.additional_data().cloned(),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn from_blob(blob: &Value, field: ProfileField) -> Option<String> {
    field
        .json_keys()
        .iter()
        .find_map(|key| lookup_path(blob, key).and_then(scalar_text))
}

fn lookup_path<'a>(blob: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(blob, |node, segment| node.as_object()?.get(segment))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
        (Some(f), None) => Some(f.to_string()),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}
