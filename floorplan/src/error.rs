//! Error types for floor plan extraction.

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for an extraction or update invocation.
///
/// Every variant is fatal for the invocation that produced it. Nothing is
/// retried inside the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The completion service call failed or returned no content.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// No balanced `{...}` region was found in the completion text.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The repaired text was not valid JSON or did not match the schema.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A room or floor plan was constructed with invalid field values.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// Client configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Attempted construction of a room with values outside the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    /// A closed-set field held a value outside its enumeration.
    #[error("'{value}' is not a valid {set}")]
    UnknownValue {
        /// Field that held the value (e.g. `type`).
        field: &'static str,
        /// Name of the closed set (e.g. `RoomType`).
        set: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Room name was empty or whitespace.
    #[error("room name must not be empty")]
    EmptyName,

    /// A required field was absent.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
}

impl SchemaViolation {
    /// Creates an unknown value error.
    #[inline]
    pub fn unknown_value(
        field: &'static str,
        set: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::UnknownValue {
            field,
            set,
            value: value.into(),
        }
    }

    /// Field the violation is attributed to.
    pub fn field(&self) -> &'static str {
        match self {
            SchemaViolation::UnknownValue { field, .. } => *field,
            SchemaViolation::EmptyName => "name",
            SchemaViolation::MissingField { field } => *field,
        }
    }
}

/// The brace extractor could not isolate a JSON object region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The text contains no `{` at all.
    #[error("no JSON object found in completion text")]
    NoOpeningBrace,

    /// The text ended before the first object's braces balanced.
    #[error("unbalanced JSON object starting at byte {start} (depth {depth} at end of text)")]
    Unbalanced {
        /// Byte offset of the opening brace.
        start: usize,
        /// Nesting depth still open when the text ended.
        depth: usize,
    },
}

/// Repaired text could not be turned into a floor plan.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid JSON, or JSON whose shape does not match the record form.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid shape, but a value violated the schema.
    #[error("{path}: {source}")]
    Schema {
        /// Location of the offending value, e.g. `rooms[1].size`.
        path: String,
        /// The underlying violation.
        #[source]
        source: SchemaViolation,
    },
}

impl ParseError {
    /// Builds a schema error for the room at `index`.
    pub fn in_room(index: usize, source: SchemaViolation) -> Self {
        let path = format!("rooms[{index}].{}", source.field());
        Self::Schema { path, source }
    }

    /// Path of the offending value, when it could be determined.
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::Json(_) => None,
            ParseError::Schema { path, .. } => Some(path),
        }
    }
}

/// The completion service call did not yield usable text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("completion transport failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("completion service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The reply carried no message content.
    #[error("completion returned empty content")]
    EmptyContent,

    /// The reply body could not be decoded.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Client configuration could not be loaded or was invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file was not valid TOML for the expected shape.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A setting held an unusable value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid value error.
    #[inline]
    pub fn invalid_value(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}
