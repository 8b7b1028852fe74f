use std::error;
use std::fmt;

use json_schema_cs::{JsonSchemaGenError, UnknownJsonLibraryError};

/// Why a generation attempt failed after the input file was found.
#[derive(Debug)]
pub enum GenerateError {
    /// The options could not be turned into generator settings.
    Configuration(UnknownJsonLibraryError),

    /// The schema could not be read, parsed, or turned into C#.
    Schema(JsonSchemaGenError),

    /// Writing the output file failed.
    Io(std::io::Error),
}

impl error::Error for GenerateError {}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(config_error) => fmt::Display::fmt(config_error, f),
            Self::Schema(schema_error) => fmt::Display::fmt(schema_error, f),
            Self::Io(io_error) => fmt::Display::fmt(io_error, f),
        }
    }
}

impl From<UnknownJsonLibraryError> for GenerateError {
    fn from(config_error: UnknownJsonLibraryError) -> Self {
        Self::Configuration(config_error)
    }
}

impl From<JsonSchemaGenError> for GenerateError {
    fn from(schema_error: JsonSchemaGenError) -> Self {
        Self::Schema(schema_error)
    }
}

impl From<std::io::Error> for GenerateError {
    fn from(io_error: std::io::Error) -> Self {
        Self::Io(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_underlying_message() {
        let err: GenerateError = UnknownJsonLibraryError {
            value: "Gson".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid JSON library 'Gson' specified. Use 'NewtonsoftJson' or 'SystemTextJson'."
        );

        let err: GenerateError = JsonSchemaGenError::from("bad schema").into();
        assert!(matches!(err, GenerateError::Schema(_)));
        assert_eq!(err.to_string(), "bad schema");
    }

    #[test]
    fn io_errors_convert() {
        let err: GenerateError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, GenerateError::Io(_)));
        assert_eq!(err.to_string(), "read-only");
    }
}
