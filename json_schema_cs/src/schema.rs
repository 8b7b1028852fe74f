use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::JsonSchemaGenError;

/// Wraps the JSON Schema `default` keyword to preserve `null`.
/// Serde deserializes `Option<Value>` with JSON null as `None`; we need to
/// distinguish absent key from `"default": null`.
#[derive(Debug, Default)]
pub enum DefaultKeyword {
    /// Key "default" was absent from the schema.
    #[default]
    Absent,
    /// Key "default" was present; the value may be `Value::Null`.
    Present(serde_json::Value),
}

impl DefaultKeyword {
    #[must_use]
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Absent => None,
            Self::Present(v) => Some(v),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultKeyword {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
        Ok(DefaultKeyword::Present(v))
    }
}

/// The `type` keyword: a single type name or a list of them (e.g. `["string", "null"]`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeKeyword {
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// The `additionalProperties` keyword: either a boolean or a schema for the extra values.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<JsonSchema>),
}

/// Root or nested JSON Schema object.
///
/// Only the schema fields used by the generator are modeled.
/// Extra keys in the JSON are ignored via serde's default behavior.
/// Uses `BTreeMap` for deterministic property ordering (alphabetical by key).
#[derive(Debug, Default, Deserialize)]
pub struct JsonSchema {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub r#type: Option<TypeKeyword>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub properties: Option<BTreeMap<String, JsonSchema>>,

    #[serde(default)]
    pub required: Option<Vec<String>>,

    #[serde(default)]
    pub r#enum: Option<Vec<serde_json::Value>>,

    #[serde(default, rename = "x-enumFlags")]
    pub enum_flags: Option<bool>,

    #[serde(default)]
    pub items: Option<Box<JsonSchema>>,

    #[serde(default, rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default)]
    pub default: DefaultKeyword,

    #[serde(default)]
    pub minimum: Option<serde_json::Number>,

    #[serde(default)]
    pub maximum: Option<serde_json::Number>,

    #[serde(default, rename = "minLength")]
    pub min_length: Option<u64>,

    #[serde(default, rename = "maxLength")]
    pub max_length: Option<u64>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default, rename = "minItems")]
    pub min_items: Option<u64>,

    #[serde(default, rename = "maxItems")]
    pub max_items: Option<u64>,

    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,

    #[serde(default)]
    pub definitions: Option<BTreeMap<String, JsonSchema>>,

    #[serde(default, rename = "$defs")]
    pub defs: Option<BTreeMap<String, JsonSchema>>,
}

/// Drop a leading UTF-8 byte order mark, which editors on Windows often write.
fn strip_byte_order_mark(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

impl JsonSchema {
    /// Read and parse a JSON Schema document from a file. A leading byte order
    /// mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns `JsonSchemaGenError::IoError` if the file cannot be read, or
    /// `JsonSchemaGenError::JsonError` if its contents are not a JSON Schema object.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, JsonSchemaGenError> {
        let schema_json: String = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(strip_byte_order_mark(&schema_json))?)
    }

    /// Whether `key` is listed in this schema's `required` array.
    #[must_use]
    pub fn is_required(&self, key: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|r| r.iter().any(|k| k == key))
    }

    /// Walks unescaped JSON Pointer segments down through the subschema keywords.
    ///
    /// Only `properties`, `definitions`, `$defs`, `items`, and schema-valued
    /// `additionalProperties` are traversable.
    #[must_use]
    pub fn resolve_pointer(&self, segments: &[String]) -> Option<&JsonSchema> {
        let mut current: &JsonSchema = self;
        let mut iter = segments.iter();
        while let Some(segment) = iter.next() {
            current = match segment.as_str() {
                "properties" => current.properties.as_ref()?.get(iter.next()?)?,
                "definitions" => current.definitions.as_ref()?.get(iter.next()?)?,
                "$defs" => current.defs.as_ref()?.get(iter.next()?)?,
                "items" => current.items.as_deref()?,
                "additionalProperties" => match current.additional_properties.as_ref()? {
                    AdditionalProperties::Schema(schema) => &**schema,
                    AdditionalProperties::Bool(_) => return None,
                },
                _ => return None,
            };
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> JsonSchema {
        serde_json::from_str(json).expect("valid schema")
    }

    #[test]
    fn default_keyword_distinguishes_null_from_absent() {
        let schema: JsonSchema = parse(
            r#"{ "properties": { "a": { "default": null }, "b": { "type": "string" } } }"#,
        );
        let props = schema.properties.expect("properties");
        assert!(matches!(
            props["a"].default,
            DefaultKeyword::Present(serde_json::Value::Null)
        ));
        assert!(matches!(props["b"].default, DefaultKeyword::Absent));
    }

    #[test]
    fn type_keyword_accepts_string_or_array() {
        let single: JsonSchema = parse(r#"{ "type": "string" }"#);
        let multiple: JsonSchema = parse(r#"{ "type": ["string", "null"] }"#);
        assert_eq!(single.r#type.expect("type").names(), vec!["string"]);
        assert_eq!(
            multiple.r#type.expect("type").names(),
            vec!["string", "null"]
        );
    }

    #[test]
    fn additional_properties_accepts_bool_or_schema() {
        let closed: JsonSchema = parse(r#"{ "additionalProperties": false }"#);
        let typed: JsonSchema = parse(r#"{ "additionalProperties": { "type": "integer" } }"#);
        assert!(matches!(
            closed.additional_properties,
            Some(AdditionalProperties::Bool(false))
        ));
        assert!(matches!(
            typed.additional_properties,
            Some(AdditionalProperties::Schema(_))
        ));
    }

    #[test]
    fn resolve_pointer_walks_definitions_and_properties() {
        let schema: JsonSchema = parse(
            r#"{
                "definitions": {
                    "Address": {
                        "properties": {
                            "lines": { "type": "array", "items": { "type": "string", "title": "Line" } }
                        }
                    }
                },
                "$defs": { "Id": { "type": "integer" } }
            }"#,
        );
        let segments: Vec<String> = ["definitions", "Address", "properties", "lines", "items"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let line: &JsonSchema = schema.resolve_pointer(&segments).expect("resolves");
        assert_eq!(line.title.as_deref(), Some("Line"));

        let id_segments: Vec<String> = vec!["$defs".to_string(), "Id".to_string()];
        assert!(schema.resolve_pointer(&id_segments).is_some());
    }

    #[test]
    fn resolve_pointer_rejects_unknown_keyword() {
        let schema: JsonSchema = parse(r#"{ "definitions": { "A": {} } }"#);
        let segments: Vec<String> = vec!["oneOf".to_string(), "0".to_string()];
        assert!(schema.resolve_pointer(&segments).is_none());
    }

    #[test]
    fn resolve_pointer_empty_is_self() {
        let schema: JsonSchema = parse(r#"{ "title": "Me" }"#);
        let resolved: &JsonSchema = schema.resolve_pointer(&[]).expect("root");
        assert_eq!(resolved.title.as_deref(), Some("Me"));
    }

    #[test]
    fn is_required_checks_required_array() {
        let schema: JsonSchema = parse(r#"{ "required": ["id"] }"#);
        assert!(schema.is_required("id"));
        assert!(!schema.is_required("name"));
    }

    #[test]
    fn from_file_reports_missing_file_as_io_error() {
        let result = JsonSchema::from_file("/definitely/not/here/schema.json");
        assert!(matches!(result, Err(JsonSchemaGenError::IoError(_))));
    }

    #[test]
    fn byte_order_mark_is_stripped_before_parsing() {
        let text: &str = "\u{feff}{ \"title\": \"P\" }";
        assert_eq!(strip_byte_order_mark(text), "{ \"title\": \"P\" }");
        assert_eq!(strip_byte_order_mark("{}"), "{}");

        let schema: JsonSchema =
            serde_json::from_str(strip_byte_order_mark(text)).expect("parse after strip");
        assert_eq!(schema.title.as_deref(), Some("P"));
    }
}
