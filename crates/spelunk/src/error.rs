//! Error types for navigation and for path descriptor parsing.
//!
//! Absent fields are not represented here: absence is swallowed into a null
//! result by the indexing policy and never surfaces as an error.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavErrorKind {
    /// Subject cannot honor the key kind it was given (e.g. a name against a
    /// sequence, a span against a tuple).
    TypeMismatch,
    /// A stream-scoped operation was invoked outside collection context.
    InvalidStreamScope,
    /// An invocation named an operation the registry does not know.
    OperationNotSupported,
    /// Bounds that cannot be honored against this subject (negative start on
    /// an unbounded stream, negative bit-slice start).
    InvalidRange,
}

impl NavErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavErrorKind::TypeMismatch => "TypeMismatch",
            NavErrorKind::InvalidStreamScope => "InvalidStreamScope",
            NavErrorKind::OperationNotSupported => "OperationNotSupported",
            NavErrorKind::InvalidRange => "InvalidRange",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavError {
    pub kind: NavErrorKind,
    pub message: String,
    /// Rendered path of segments consumed up to and including the failing
    /// one, rooted at `$`.
    pub trail: Option<String>,
}

impl NavError {
    pub fn new(kind: NavErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trail: None,
        }
    }

    pub fn with_trail(mut self, trail: impl Into<String>) -> Self {
        self.trail = Some(trail.into());
        self
    }

    /// Attaches a trail unless one is already set. Errors deferred inside a
    /// lazy sequence keep the trail of the step that produced them.
    pub(crate) fn at(self, trail: &str) -> Self {
        if self.trail.is_some() {
            self
        } else {
            self.with_trail(trail)
        }
    }
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(trail) = &self.trail {
            write!(f, "{} (at: {})", self.message, trail)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for NavError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathErrorKind {
    /// The descriptor document is not a sequence of segments.
    InvalidDocument,
    /// A segment has no recognizable shape.
    InvalidSegment,
    /// A key position holds something that is not a name, index, or span.
    InvalidKey,
    /// A span object with bad or unknown fields.
    InvalidSpan,
    /// An invocation object with bad or unknown fields.
    InvalidInvocation,
}

impl PathErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathErrorKind::InvalidDocument => "InvalidDocument",
            PathErrorKind::InvalidSegment => "InvalidSegment",
            PathErrorKind::InvalidKey => "InvalidKey",
            PathErrorKind::InvalidSpan => "InvalidSpan",
            PathErrorKind::InvalidInvocation => "InvalidInvocation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub kind: PathErrorKind,
    pub message: String,
    /// Zero-based position of the offending segment in the descriptor.
    pub segment: Option<usize>,
}

impl PathError {
    pub fn new(kind: PathErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            segment: None,
        }
    }

    pub fn at_segment(mut self, segment: usize) -> Self {
        self.segment = Some(segment);
        self
    }
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(segment) = self.segment {
            write!(f, "{} (segment {})", self.message, segment)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for PathError {}

impl From<serde_yaml::Error> for PathError {
    fn from(err: serde_yaml::Error) -> Self {
        PathError::new(
            PathErrorKind::InvalidDocument,
            format!("yaml error: {}", err),
        )
    }
}

impl From<serde_json::Error> for PathError {
    fn from(err: serde_json::Error) -> Self {
        PathError::new(
            PathErrorKind::InvalidDocument,
            format!("json error: {}", err),
        )
    }
}
