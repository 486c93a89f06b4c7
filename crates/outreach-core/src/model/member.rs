//! Target list members
//!
//! Members arrive from two generations of import: rows with normalized
//! columns (possibly plus an enrichment blob), and legacy rows whose only
//! content is a free-form JSON object. `MemberSource` makes the two shapes
//! explicit instead of probing optional columns at every read site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Personalization fields copied into snapshot rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FullName,
    FirstName,
    LastName,
    Email,
    Title,
    Company,
    CompanyDomain,
    Location,
    LinkedinUrl,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::FullName,
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Email,
        ProfileField::Title,
        ProfileField::Company,
        ProfileField::CompanyDomain,
        ProfileField::Location,
        ProfileField::LinkedinUrl,
    ];

    /// Column name in `list_members` and `enrollment_profiles`
    pub fn column(&self) -> &'static str {
        match self {
            ProfileField::FullName => "full_name",
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::Email => "email",
            ProfileField::Title => "title",
            ProfileField::Company => "company",
            ProfileField::CompanyDomain => "company_domain",
            ProfileField::Location => "location",
            ProfileField::LinkedinUrl => "linkedin_url",
        }
    }

    /// Keys probed in the JSON blob, in priority order. Dotted keys address
    /// nested objects (provider payloads nest the employer under
    /// `organization`).
    pub fn json_keys(&self) -> &'static [&'static str] {
        match self {
            ProfileField::FullName => &["fullName", "full_name", "name"],
            ProfileField::FirstName => &["firstName", "first_name"],
            ProfileField::LastName => &["lastName", "last_name"],
            ProfileField::Email => &["email", "emailAddress", "work_email"],
            ProfileField::Title => &["title", "jobTitle", "job_title", "headline"],
            ProfileField::Company => &[
                "company",
                "companyName",
                "company_name",
                "organization.name",
            ],
            ProfileField::CompanyDomain => &[
                "companyDomain",
                "company_domain",
                "domain",
                "organization.primary_domain",
            ],
            ProfileField::Location => &["location", "city", "country"],
            ProfileField::LinkedinUrl => &["linkedinUrl", "linkedin_url", "linkedin"],
        }
    }
}

/// Normalized member columns; every column is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl NormalizedFields {
    pub fn get(&self, field: ProfileField) -> Option<&str> {
        let value = match field {
            ProfileField::FullName => &self.full_name,
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Email => &self.email,
            ProfileField::Title => &self.title,
            ProfileField::Company => &self.company,
            ProfileField::CompanyDomain => &self.company_domain,
            ProfileField::Location => &self.location,
            ProfileField::LinkedinUrl => &self.linkedin_url,
        };
        value.as_deref()
    }

    /// True when no column carries a non-blank value
    pub fn is_empty(&self) -> bool {
        ProfileField::ALL
            .iter()
            .all(|f| self.get(*f).map_or(true, |v| v.trim().is_empty()))
    }
}

/// Content of one list member
#[derive(Debug, Clone, PartialEq)]
pub enum MemberSource {
    /// At least one normalized column is present; the blob is enrichment
    Normalized {
        fields: NormalizedFields,
        additional_data: Option<Value>,
    },
    /// Legacy row: only the free-form blob exists
    Legacy(Value),
}

impl MemberSource {
    /// Classify stored columns into one of the two shapes
    pub fn from_parts(fields: NormalizedFields, additional_data: Option<Value>) -> Self {
        if fields.is_empty() {
            MemberSource::Legacy(additional_data.unwrap_or_else(|| Value::Object(Default::default())))
        } else {
            MemberSource::Normalized {
                fields,
                additional_data,
            }
        }
    }

    /// Split back into column values for persistence
    pub fn to_parts(&self) -> (NormalizedFields, Option<Value>) {
        match self {
            MemberSource::Normalized {
                fields,
                additional_data,
            } => (fields.clone(), additional_data.clone()),
            MemberSource::Legacy(blob) => (NormalizedFields::default(), Some(blob.clone())),
        }
    }

    pub fn additional_data(&self) -> Option<&Value> {
        match self {
            MemberSource::Normalized {
                additional_data, ..
            } => additional_data.as_ref(),
            MemberSource::Legacy(blob) => Some(blob),
        }
    }

    /// Neither a usable column nor a non-empty JSON object
    pub fn is_blank(&self) -> bool {
        match self {
            MemberSource::Normalized { fields, .. } => fields.is_empty(),
            MemberSource::Legacy(Value::Object(map)) => map.is_empty(),
            MemberSource::Legacy(Value::Null) => true,
            MemberSource::Legacy(_) => false,
        }
    }
}

/// Member as stored in a target list
#[derive(Debug, Clone, PartialEq)]
pub struct ListMember {
    pub id: String,
    pub list_id: String,
    pub source: MemberSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member payload accepted by list imports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewListMember {
    #[serde(flatten)]
    pub fields: NormalizedFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
}

impl NewListMember {
    pub fn into_source(self) -> MemberSource {
        MemberSource::from_parts(self.fields, self.additional_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_columns_classify_as_legacy() {
        let fields = NormalizedFields {
            full_name: Some("   ".to_string()),
            ..Default::default()
        };
        let source = MemberSource::from_parts(fields, Some(json!({"name": "Alice"})));
        assert!(matches!(source, MemberSource::Legacy(_)));
    }

    #[test]
    fn test_any_column_classifies_as_normalized() {
        let fields = NormalizedFields {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        let source = MemberSource::from_parts(fields, None);
        assert!(matches!(source, MemberSource::Normalized { .. }));
        assert!(!source.is_blank());
    }

    #[test]
    fn test_new_member_deserializes_flat_columns() {
        let member: NewListMember = serde_json::from_value(json!({
            "full_name": "Alice Doe",
            "email": "alice@example.com",
            "additional_data": {"seniority": "vp"}
        }))
        .unwrap();
        assert_eq!(member.fields.full_name.as_deref(), Some("Alice Doe"));
        assert_eq!(member.additional_data, Some(json!({"seniority": "vp"})));
    }

    #[test]
    fn test_empty_object_is_blank() {
        assert!(MemberSource::Legacy(json!({})).is_blank());
        assert!(!MemberSource::Legacy(json!({"name": "x"})).is_blank());
    }
}
