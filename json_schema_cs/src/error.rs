use std::error;
use std::fmt;

/// Error type for JSON Schema to C# generation.
///
/// Variants that point at a location in the schema carry a JSON Pointer
/// (`""` for the root); `Display` renders it as a `#`-prefixed fragment.
#[derive(Debug)]
pub enum JsonSchemaGenError {
    /// Generic error with a message.
    GenericError(String),

    /// I/O error (e.g., reading schema file, writing output).
    IoError(std::io::Error),

    /// JSON parsing error.
    JsonError(serde_json::Error),

    /// A local `$ref` whose pointer does not lead to a schema.
    UnresolvedReference { pointer: String, reference: String },

    /// A `$ref` that is not a local `#` fragment.
    UnsupportedReference { pointer: String, reference: String },

    /// A chain of `$ref`s that loops back on itself without reaching a named type.
    CircularReference { pointer: String, reference: String },

    /// A `type` keyword naming something other than the JSON Schema primitive types.
    UnsupportedType { pointer: String, type_name: String },

    /// An `enum` mixing strings, integers, or other values.
    UnsupportedEnum { pointer: String },

    /// A `pattern` that does not compile as an ECMAScript regular expression.
    InvalidPattern {
        pointer: String,
        pattern: String,
        message: String,
    },
}

impl error::Error for JsonSchemaGenError {}

impl fmt::Display for JsonSchemaGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericError(message) => write!(f, "{message}"),
            Self::IoError(io_error) => fmt::Display::fmt(io_error, f),
            Self::JsonError(json_error) => fmt::Display::fmt(json_error, f),
            Self::UnresolvedReference { pointer, reference } => {
                write!(f, "Unresolved $ref '{reference}' at '#{pointer}'")
            }
            Self::UnsupportedReference { pointer, reference } => write!(
                f,
                "Unsupported $ref '{reference}' at '#{pointer}': only local '#' references are supported"
            ),
            Self::CircularReference { pointer, reference } => {
                write!(f, "Circular $ref '{reference}' at '#{pointer}'")
            }
            Self::UnsupportedType { pointer, type_name } => {
                write!(f, "Unsupported type '{type_name}' at '#{pointer}'")
            }
            Self::UnsupportedEnum { pointer } => write!(
                f,
                "Unsupported enum at '#{pointer}': values must be all strings or all integers"
            ),
            Self::InvalidPattern {
                pointer,
                pattern,
                message,
            } => write!(
                f,
                "Invalid pattern '{pattern}' at '#{pointer}': {message}"
            ),
        }
    }
}

impl From<&str> for JsonSchemaGenError {
    fn from(message: &str) -> Self {
        Self::GenericError(message.to_string())
    }
}

impl From<String> for JsonSchemaGenError {
    fn from(message: String) -> Self {
        Self::GenericError(message)
    }
}

impl From<std::io::Error> for JsonSchemaGenError {
    fn from(io_error: std::io::Error) -> Self {
        Self::IoError(io_error)
    }
}

impl From<serde_json::Error> for JsonSchemaGenError {
    fn from(json_error: serde_json::Error) -> Self {
        Self::JsonError(json_error)
    }
}
