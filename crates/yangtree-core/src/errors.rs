use thiserror::Error;
use yangtree_core_types::ElementId;

/// Result type alias using YangError
pub type Result<T> = std::result::Result<T, YangError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the engine. Each kind maps to a stable error code that tree
/// assemblers can match on when presenting configuration errors to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Value validation
    ConstraintViolation,
    TypeMismatch,
    InvalidRestriction,

    // Keyed lists
    DuplicateKey,
    MissingKey,

    // Element wrapper
    CapabilityUnsupported,
    UnmappedChoiceCase,

    // References
    ResolutionFailure,

    // Lookup
    NotFound,
    InvalidInput,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::InvalidRestriction => "ERR_INVALID_RESTRICTION",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::MissingKey => "ERR_MISSING_KEY",
            ExErrorKind::CapabilityUnsupported => "ERR_CAPABILITY_UNSUPPORTED",
            ExErrorKind::UnmappedChoiceCase => "ERR_UNMAPPED_CHOICE_CASE",
            ExErrorKind::ResolutionFailure => "ERR_RESOLUTION_FAILURE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add registry path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add candidates (allowed types, union members, or reference targets)
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the candidates, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
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
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// ========== Engine Errors ==========

/// Comprehensive error taxonomy for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum YangError {
    // ===== Value Validation =====
    /// Value failed a pattern, range or enumeration restriction
    #[error("'{value}' did not match restricted type ({restriction})")]
    ConstraintViolation { value: String, restriction: String },

    /// A restriction argument could not be compiled
    #[error("invalid restriction {restriction}: {reason}")]
    InvalidRestriction { restriction: String, reason: String },

    /// Value cannot be represented by the requested base type
    #[error("'{value}' is not a valid {expected}")]
    TypeMismatch { value: String, expected: String },

    /// Element rejected by every allowed type of a typed list
    #[error("cannot add '{value}' to typed list (accepts only {allowed:?})")]
    TypedListRejected { value: String, allowed: Vec<String> },

    /// No union member type accepted the value
    #[error("did not find a valid type for '{value}' among {candidates:?}")]
    UnionMismatch {
        value: String,
        candidates: Vec<String>,
    },

    /// Fraction-digit count outside what the decimal representation can hold
    #[error("unsupported fraction-digits {digits}")]
    InvalidPrecision { digits: u32 },

    // ===== Keyed Lists =====
    /// Key value is already present in the list
    #[error("{key} is already defined as a list entry of {list}")]
    DuplicateKey { list: String, key: String },

    /// Key value is absent from the list (or was not supplied)
    #[error("key {key} was not in list {list}")]
    MissingKey { list: String, key: String },

    /// Composite key value does not supply every key leaf
    #[error("list {list} key must contain all key elements {expected:?}, got '{got}'")]
    KeyArity {
        list: String,
        expected: Vec<String>,
        got: String,
    },

    // ===== Element Wrapper =====
    /// The wrapped base type does not support the requested operation
    #[error("{base_type} object has no attribute {op}")]
    CapabilityUnsupported { op: String, base_type: String },

    /// A sibling case member has no unset hook in its container
    #[error("unmapped choice: {choice}/{case} member {member} has no unset hook")]
    UnmappedChoiceCase {
        choice: String,
        case: String,
        member: String,
    },

    // ===== References =====
    /// Required-instance reference value matched no target
    #[error("no such key ({value}) existed in path ({path} -> {candidates:?})")]
    ResolutionFailure {
        value: String,
        path: String,
        candidates: Vec<String>,
    },

    /// A live pointer no longer resolves to exactly one element
    #[error("invalid pointer specified: {path} resolved to {matches} elements")]
    InvalidPointer { path: String, matches: usize },

    // ===== Lookup =====
    /// Arena slot is empty or out of range
    #[error("element not found: {id}")]
    ElementNotFound { id: ElementId },

    /// Container has no child of that name
    #[error("{parent} has no child named {name}")]
    ChildNotFound { parent: String, name: String },

    /// Sequence does not hold the value to remove
    #[error("{value} is not in {owner}")]
    ValueNotPresent { owner: String, value: String },

    /// Positional access beyond the end of a sequence
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    // ===== Configuration =====
    /// Configuration text could not be parsed
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Conversion from YangError to ExError
///
/// Tree assemblers report through the canonical facility; the engine itself
/// raises the concrete variants.
impl From<YangError> for ExError {
    fn from(err: YangError) -> Self {
        let message = err.to_string();
        match err {
            YangError::ConstraintViolation { .. } => {
                ExError::new(ExErrorKind::ConstraintViolation).with_message(message)
            }

            YangError::InvalidRestriction { .. } | YangError::InvalidPrecision { .. } => {
                ExError::new(ExErrorKind::InvalidRestriction).with_message(message)
            }

            YangError::TypeMismatch { .. } => {
                ExError::new(ExErrorKind::TypeMismatch).with_message(message)
            }

            YangError::TypedListRejected { allowed, .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_op("typed_list_check")
                .with_message(message)
                .with_candidates(allowed),

            YangError::UnionMismatch { candidates, .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_op("union_construct")
                .with_message(message)
                .with_candidates(candidates),

            YangError::DuplicateKey { list, .. } => ExError::new(ExErrorKind::DuplicateKey)
                .with_op("list_add")
                .with_path(list)
                .with_message(message),

            YangError::MissingKey { list, .. } => ExError::new(ExErrorKind::MissingKey)
                .with_path(list)
                .with_message(message),

            YangError::KeyArity { list, .. } => ExError::new(ExErrorKind::MissingKey)
                .with_op("list_add")
                .with_path(list)
                .with_message(message),

            YangError::CapabilityUnsupported { op, .. } => {
                ExError::new(ExErrorKind::CapabilityUnsupported)
                    .with_op(op)
                    .with_message(message)
            }

            YangError::UnmappedChoiceCase { .. } => ExError::new(ExErrorKind::UnmappedChoiceCase)
                .with_op("set")
                .with_message(message),

            YangError::ResolutionFailure {
                path, candidates, ..
            } => ExError::new(ExErrorKind::ResolutionFailure)
                .with_op("resolve_reference")
                .with_path(path)
                .with_message(message)
                .with_candidates(candidates),

            YangError::InvalidPointer { path, .. } => ExError::new(ExErrorKind::ResolutionFailure)
                .with_op("read_pointer")
                .with_path(path)
                .with_message(message),

            YangError::ElementNotFound { .. }
            | YangError::ChildNotFound { .. }
            | YangError::ValueNotPresent { .. } => {
                ExError::new(ExErrorKind::NotFound).with_message(message)
            }

            YangError::IndexOutOfRange { .. } | YangError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
