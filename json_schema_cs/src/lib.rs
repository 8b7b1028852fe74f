//! Generate C# classes from JSON Schema.

mod codegen;
mod error;
mod json_pointer;
mod naming;
mod schema;
mod settings;

pub use error::JsonSchemaGenError;
pub use schema::{AdditionalProperties, DefaultKeyword, JsonSchema, TypeKeyword};
pub use settings::{
    CSharpGeneratorSettings, CSharpJsonLibrary, DEFAULT_NAMESPACE, UnknownJsonLibraryError,
};

use std::io::Write;

/// File extension (without the dot) of generated C# source files.
pub const FILE_EXTENSION: &str = "cs";

/// Parse a JSON Schema document from a string.
///
/// # Errors
///
/// Returns `JsonSchemaGenError::JsonError` if the string is not valid JSON or not a schema object.
pub fn parse_schema(schema_json: &str) -> Result<JsonSchema, JsonSchemaGenError> {
    Ok(serde_json::from_str(schema_json)?)
}

/// Generate C# classes from a parsed JSON Schema and write them to `writer`.
///
/// The writer can be any type implementing `Write`, such as `File`, `Vec<u8>`, or
/// `Cursor<Vec<u8>>`, enabling easy unit testing without file system interaction.
/// Nothing is written if the schema cannot be generated.
///
/// # Errors
///
/// Returns `JsonSchemaGenError` if the schema cannot be mapped to C# (bad `$ref`,
/// unsupported type or enum, invalid `pattern`, invalid namespace, nothing to generate)
/// or writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    schema: &JsonSchema,
    writer: &mut W,
    settings: &CSharpGeneratorSettings,
) -> Result<(), JsonSchemaGenError> {
    codegen::generate_to_writer(schema, writer, settings)
}

/// Generate the complete contents of a C# source file for `schema`.
///
/// # Errors
///
/// Returns `JsonSchemaGenError` under the same conditions as [`generate_to_writer`].
pub fn generate_file(
    schema: &JsonSchema,
    settings: &CSharpGeneratorSettings,
) -> Result<String, JsonSchemaGenError> {
    let mut output: Vec<u8> = Vec::new();
    generate_to_writer(schema, &mut output, settings)?;
    String::from_utf8(output).map_err(|e| JsonSchemaGenError::GenericError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_schema_rejects_invalid_json() {
        let result = parse_schema("{ not json");
        assert!(matches!(result, Err(JsonSchemaGenError::JsonError(_))));
    }

    #[test]
    fn generate_file_returns_namespace_wrapped_source() {
        let schema: JsonSchema = parse_schema(
            r#"{ "title": "Ping", "type": "object", "properties": { "at": { "type": "string", "format": "date-time" } } }"#,
        )
        .expect("valid schema");
        let settings = CSharpGeneratorSettings {
            namespace: "Acme.Events".to_string(),
            ..CSharpGeneratorSettings::default()
        };
        let source: String = generate_file(&schema, &settings).expect("generates");
        assert!(source.contains("namespace Acme.Events\n{\n"));
        assert!(source.contains("    public partial class Ping\n"));
        assert!(source.contains("public System.DateTimeOffset At { get; set; }"));
        assert!(source.ends_with("}\n"));
    }
}
