use outreach_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias for the pure domain rules
pub type Result<T> = std::result::Result<T, OutreachError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (CLI, UI layer) can
/// switch on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    EmptyList,
    ListInUse,
    Unsubscribed,
    AlreadyExists,

    // Lookup
    NotFound,

    // Auth
    Unauthorised,
    Forbidden,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Timeout,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::EmptyList => "ERR_EMPTY_LIST",
            ExErrorKind::ListInUse => "ERR_LIST_IN_USE",
            ExErrorKind::Unsubscribed => "ERR_UNSUBSCRIBED",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Caller does not own the target, or no user is authenticated
    pub fn is_authorization(&self) -> bool {
        matches!(self, ExErrorKind::Unauthorised | ExErrorKind::Forbidden)
    }

    /// Rejected input or a rejected state transition; never retried
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::EmptyList
                | ExErrorKind::ListInUse
                | ExErrorKind::Unsubscribed
                | ExErrorKind::AlreadyExists
        )
    }

    /// Transient store failure; the whole operation may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::Concurrency | ExErrorKind::Timeout)
    }
}

/// Canonical structured error type
///
/// Store, engine and CLI layers all return this type. The classification
/// fields are stable; `message` is for humans.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the id of the entity the failure concerns
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    pub fn is_authorization(&self) -> bool {
        self.kind.is_authorization()
    }

    pub fn is_validation(&self) -> bool {
        self.kind.is_validation()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by the pure rules in this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutreachError {
    /// A required text field was empty or whitespace
    #[error("{field} must not be blank")]
    BlankField { field: String },

    /// A string did not name a known enum variant
    #[error("Invalid {field}: '{value}'")]
    InvalidEnumValue { field: String, value: String },

    /// A list member carried no usable data at all
    #[error("List member has no data (index {index})")]
    EmptyMember { index: usize },

    /// Enrollment requested for a list without members
    #[error("Cannot enroll empty list: {list_id}")]
    EmptyList { list_id: String },

    /// Destructive change requested on a list already enrolled in a campaign
    #[error("List {list_id} is used in campaigns and cannot be {action}")]
    ListInUse { list_id: String, action: String },

    /// Any transition on a recipient who unsubscribed
    #[error("Recipient {enrollment_profile_id} has unsubscribed")]
    Unsubscribed { enrollment_profile_id: String },

    /// Sequence step definition rejected
    #[error("Invalid sequence step {step_number}: {reason}")]
    InvalidSequenceStep { step_number: i64, reason: String },

    /// Sequence step number already taken for this campaign
    #[error("Sequence step {step_number} already exists for campaign {campaign_id}")]
    DuplicateSequenceStep {
        campaign_id: String,
        step_number: i64,
    },

    /// Stored JSON could not be parsed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<OutreachError> for ExError {
    fn from(err: OutreachError) -> Self {
        let message = err.to_string();
        match err {
            OutreachError::BlankField { .. }
            | OutreachError::InvalidEnumValue { .. }
            | OutreachError::EmptyMember { .. }
            | OutreachError::InvalidSequenceStep { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            OutreachError::EmptyList { list_id } => ExError::new(ExErrorKind::EmptyList)
                .with_entity_id(list_id)
                .with_message(message),
            OutreachError::ListInUse { list_id, .. } => ExError::new(ExErrorKind::ListInUse)
                .with_entity_id(list_id)
                .with_message(message),
            OutreachError::Unsubscribed {
                enrollment_profile_id,
            } => ExError::new(ExErrorKind::Unsubscribed)
                .with_entity_id(enrollment_profile_id)
                .with_message(message),
            OutreachError::DuplicateSequenceStep { campaign_id, .. } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity_id(campaign_id)
                    .with_message(message)
            }
            OutreachError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for OutreachError {
    fn from(err: serde_json::Error) -> Self {
        OutreachError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ExErrorKind::Forbidden.is_authorization());
        assert!(ExErrorKind::Unauthorised.is_authorization());
        assert!(ExErrorKind::EmptyList.is_validation());
        assert!(!ExErrorKind::NotFound.is_validation());
        assert!(ExErrorKind::Concurrency.is_retryable());
        assert!(!ExErrorKind::Persistence.is_retryable());
    }

    #[test]
    fn test_empty_list_maps_to_empty_list_kind() {
        let err: ExError = OutreachError::EmptyList {
            list_id: "list-1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::EmptyList);
        assert_eq!(err.entity_id(), Some("list-1"));
        assert!(err.message().contains("Cannot enroll empty list"));
    }

    #[test]
    fn test_display_includes_code_and_op() {
        let err = ExError::new(ExErrorKind::Forbidden)
            .with_op("create_campaign_enrollment")
            .with_message("campaign is owned by another user");
        let shown = err.to_string();
        assert!(shown.starts_with("[ERR_FORBIDDEN]"));
        assert!(shown.contains("create_campaign_enrollment"));
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Persistence)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
