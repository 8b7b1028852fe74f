use crate::error::JsonSchemaGenError;
use crate::json_pointer;
use crate::naming::{self, NameScope};
use crate::schema::{AdditionalProperties, JsonSchema};
use crate::settings::{CSharpGeneratorSettings, CSharpJsonLibrary};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

const FILE_HEADER: &str = "//----------------------
// <auto-generated>
//     Generated by json-schema-cs. Do not edit manually.
// </auto-generated>
//----------------------";

const TYPE_INDENT: &str = "    ";
const MEMBER_INDENT: &str = "        ";
const BODY_INDENT: &str = "            ";

/// JSON Schema `type` names the generator accepts.
const SUPPORTED_TYPES: &[&str] = &[
    "string", "integer", "number", "boolean", "object", "array", "null",
];

/// Resolved C# type of a property, array item, or dictionary value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeRef {
    /// Built-in or framework type, e.g. `string`, `int`, `System.Guid`.
    Builtin(&'static str),
    Class(String),
    Enum(String),
    Array(Box<TypeRef>),
    Map(Box<TypeRef>),
    /// `object`
    Any,
}

/// A resolved type plus whether the schema itself admits `null`.
struct Resolved {
    type_ref: TypeRef,
    nullable: bool,
}

/// Represents a class to be emitted.
struct ClassDef<'a> {
    name: String,
    schema: &'a JsonSchema,
    properties: Vec<PropertyDef<'a>>,
    /// `additionalProperties` is `true` or a schema: collect unknown members.
    extension_data: bool,
    /// `additionalProperties: false`: reject unknown members.
    disallow_unmapped: bool,
}

/// Represents a property within a class.
struct PropertyDef<'a> {
    name: String,
    json_key: String,
    schema: &'a JsonSchema,
    type_ref: TypeRef,
    required: bool,
    nullable: bool,
}

/// Represents an enum to be emitted.
struct EnumDef<'a> {
    name: String,
    schema: &'a JsonSchema,
    members: Vec<EnumMember>,
    flags: bool,
    /// Declared `: long` because a member does not fit in `int`.
    long_backed: bool,
}

struct EnumMember {
    name: String,
    /// The JSON string for string enums; `None` for integer enums.
    json_value: Option<String>,
    value: i64,
}

enum TypeDef<'a> {
    Class(ClassDef<'a>),
    Enum(EnumDef<'a>),
}

/// The values of an `enum` keyword with `null` removed.
enum EnumValues {
    Strings(Vec<String>),
    Integers(Vec<i64>),
    Empty,
}

/// What the root or a definitions entry is emitted as.
#[derive(Debug, Clone, Copy)]
enum NamedKind {
    Class,
    Enum,
}

impl NamedKind {
    fn type_ref(self, name: String) -> TypeRef {
        match self {
            Self::Class => TypeRef::Class(name),
            Self::Enum => TypeRef::Enum(name),
        }
    }
}

/// A class or enum registered under a JSON Pointer, reachable by `$ref`.
struct NamedType<'a> {
    type_ref: TypeRef,
    schema: &'a JsonSchema,
}

/// Returns true if the format indicates a UUID (uuid, uuid1..uuid8, guid; case-insensitive).
fn is_uuid_format(format: &str) -> bool {
    matches!(
        format.to_lowercase().as_str(),
        "uuid"
            | "uuid1"
            | "uuid2"
            | "uuid3"
            | "uuid4"
            | "uuid5"
            | "uuid6"
            | "uuid7"
            | "uuid8"
            | "guid"
    )
}

/// Map a string schema's `format` to a C# type.
fn string_type(format: Option<&str>) -> &'static str {
    let Some(f) = format else {
        return "string";
    };
    if is_uuid_format(f) {
        return "System.Guid";
    }
    match f.to_lowercase().as_str() {
        "date-time" | "date" => "System.DateTimeOffset",
        "time" | "duration" | "time-span" => "System.TimeSpan",
        "uri" => "System.Uri",
        "byte" | "binary" => "byte[]",
        _ => "string",
    }
}

/// `long` when the format says so or a bound falls outside the `int` range; `int` otherwise.
fn choose_integer_type(schema: &JsonSchema) -> &'static str {
    if schema.format.as_deref() == Some("int64") {
        return "long";
    }
    let fits_int = |bound: Option<&serde_json::Number>| {
        bound.is_none_or(|n| {
            n.as_f64()
                .is_some_and(|v| v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX))
        })
    };
    if fits_int(schema.minimum.as_ref()) && fits_int(schema.maximum.as_ref()) {
        "int"
    } else {
        "long"
    }
}

fn choose_number_type(schema: &JsonSchema) -> &'static str {
    match schema.format.as_deref() {
        Some("float") => "float",
        Some("decimal") => "decimal",
        _ => "double",
    }
}

/// Primary JSON type of a schema with `null` dropped, and whether `null` was allowed.
/// `None` means "anything" (no type, only `null`, or several non-null types).
fn effective_type<'s>(
    schema: &'s JsonSchema,
    pointer: &str,
) -> Result<(Option<&'s str>, bool), JsonSchemaGenError> {
    let Some(ref type_keyword) = schema.r#type else {
        let inferred: Option<&str> = if schema.properties.is_some() {
            Some("object")
        } else if schema.items.is_some() {
            Some("array")
        } else {
            None
        };
        return Ok((inferred, false));
    };
    let names: Vec<&str> = type_keyword.names();
    if let Some(unknown) = names.iter().find(|n| !SUPPORTED_TYPES.contains(n)) {
        return Err(JsonSchemaGenError::UnsupportedType {
            pointer: pointer.to_string(),
            type_name: (*unknown).to_string(),
        });
    }
    let nullable: bool = names.contains(&"null");
    let non_null: Vec<&str> = names.into_iter().filter(|n| *n != "null").collect();
    match non_null.as_slice() {
        [single] => Ok((Some(*single), nullable)),
        _ => Ok((None, nullable)),
    }
}

/// Split `enum` values into strings or integers, noting whether `null` is a member.
fn classify_enum(
    values: &[serde_json::Value],
    pointer: &str,
) -> Result<(EnumValues, bool), JsonSchemaGenError> {
    let unsupported = || JsonSchemaGenError::UnsupportedEnum {
        pointer: pointer.to_string(),
    };
    let mut strings: Vec<String> = Vec::new();
    let mut integers: Vec<i64> = Vec::new();
    let mut has_null: bool = false;
    for value in values {
        match value {
            serde_json::Value::Null => has_null = true,
            serde_json::Value::String(s) => strings.push(s.clone()),
            serde_json::Value::Number(n) => integers.push(n.as_i64().ok_or_else(unsupported)?),
            _ => return Err(unsupported()),
        }
    }
    let classified: EnumValues = match (strings.is_empty(), integers.is_empty()) {
        (false, false) => return Err(unsupported()),
        (false, true) => EnumValues::Strings(strings),
        (true, false) => EnumValues::Integers(integers),
        (true, true) => EnumValues::Empty,
    };
    Ok((classified, has_null))
}

fn has_enum_members(schema: &JsonSchema, pointer: &str) -> Result<bool, JsonSchemaGenError> {
    let Some(ref values) = schema.r#enum else {
        return Ok(false);
    };
    let (classified, _) = classify_enum(values, pointer)?;
    Ok(!matches!(classified, EnumValues::Empty))
}

/// Object schemas that need their own class when nested under a property.
fn is_class_schema(schema: &JsonSchema) -> bool {
    schema.properties.as_ref().is_some_and(|p| !p.is_empty())
        || matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(false))
        )
}

/// Object schemas with no properties whose values are described by `additionalProperties`.
fn is_inline_map(schema: &JsonSchema) -> bool {
    schema.properties.as_ref().is_none_or(BTreeMap::is_empty)
        && matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(true) | AdditionalProperties::Schema(_))
        )
}

fn has_definitions(schema: &JsonSchema) -> bool {
    schema.definitions.as_ref().is_some_and(|d| !d.is_empty())
        || schema.defs.as_ref().is_some_and(|d| !d.is_empty())
}

/// Whether the root or a definitions entry becomes a class, an enum, or nothing of its own.
fn named_type_kind(
    schema: &JsonSchema,
    pointer: &str,
    is_root: bool,
) -> Result<Option<NamedKind>, JsonSchemaGenError> {
    if schema.reference.is_some() {
        return Ok(None);
    }
    if has_enum_members(schema, pointer)? {
        return Ok(Some(NamedKind::Enum));
    }
    let (primary, _) = effective_type(schema, pointer)?;
    let is_class: bool = match primary {
        Some("object") => is_root || !is_inline_map(schema),
        None => is_root && schema.r#type.is_none() && !has_definitions(schema),
        Some(_) => false,
    };
    Ok(is_class.then_some(NamedKind::Class))
}

fn check_pattern(schema: &JsonSchema, pointer: &str) -> Result<(), JsonSchemaGenError> {
    let Some(ref pattern) = schema.pattern else {
        return Ok(());
    };
    regress::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| JsonSchemaGenError::InvalidPattern {
            pointer: pointer.to_string(),
            pattern: pattern.clone(),
            message: e.to_string(),
        })
}

/// Walks the schema and collects every class and enum to emit.
struct Collector<'a> {
    root: &'a JsonSchema,
    settings: &'a CSharpGeneratorSettings,
    scope: NameScope,
    /// Canonical JSON Pointer -> named type defined by the schema at that location.
    named: BTreeMap<String, NamedType<'a>>,
    /// Inline `$ref` targets currently being resolved, for cycle detection.
    resolving: BTreeSet<String>,
    types: BTreeMap<String, TypeDef<'a>>,
}

impl<'a> Collector<'a> {
    fn new(root: &'a JsonSchema, settings: &'a CSharpGeneratorSettings) -> Self {
        Self {
            root,
            settings,
            scope: NameScope::default(),
            named: BTreeMap::new(),
            resolving: BTreeSet::new(),
            types: BTreeMap::new(),
        }
    }

    /// Assign names to the root and all definitions up front so `$ref`s resolve
    /// regardless of traversal order.
    fn register_named_types(&mut self) -> Result<(), JsonSchemaGenError> {
        let root: &'a JsonSchema = self.root;
        if let Some(kind) = named_type_kind(root, "", true)? {
            let name: String = self
                .scope
                .claim(&naming::type_name_from_title(root.title.as_deref(), "Root"));
            self.named.insert(
                String::new(),
                NamedType {
                    type_ref: kind.type_ref(name),
                    schema: root,
                },
            );
        }

        for (keyword, definitions) in [("definitions", &root.definitions), ("$defs", &root.defs)] {
            let Some(definitions) = definitions else {
                continue;
            };
            let keyword_pointer: String = json_pointer::format("", keyword);
            for (key, schema) in definitions {
                let pointer: String = json_pointer::format(&keyword_pointer, key);
                if let Some(kind) = named_type_kind(schema, &pointer, false)? {
                    let name: String = self.scope.claim(&naming::to_type_name(key));
                    self.named.insert(
                        pointer,
                        NamedType {
                            type_ref: kind.type_ref(name),
                            schema,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn collect_named_types(&mut self) -> Result<(), JsonSchemaGenError> {
        let entries: Vec<(String, TypeRef, &'a JsonSchema)> = self
            .named
            .iter()
            .map(|(pointer, named)| (pointer.clone(), named.type_ref.clone(), named.schema))
            .collect();
        for (pointer, type_ref, schema) in entries {
            match type_ref {
                TypeRef::Class(name) => self.collect_class(schema, name, &pointer)?,
                TypeRef::Enum(name) => self.collect_enum(schema, name, &pointer)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn collect_class(
        &mut self,
        schema: &'a JsonSchema,
        name: String,
        pointer: &str,
    ) -> Result<(), JsonSchemaGenError> {
        let extension_data: bool = matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(true) | AdditionalProperties::Schema(_))
        );
        let disallow_unmapped: bool = matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(false))
        );

        let mut members = NameScope::default();
        if extension_data {
            members.claim("AdditionalProperties");
        }
        if self.settings.generate_json_methods {
            members.claim("ToJson");
            members.claim("FromJson");
        }

        let mut properties: Vec<PropertyDef<'a>> = Vec::new();
        if let Some(ref props) = schema.properties {
            let properties_pointer: String = json_pointer::format(pointer, "properties");
            for (key, prop_schema) in props {
                let prop_pointer: String = json_pointer::format(&properties_pointer, key);
                let resolved: Resolved = self.resolve_type(prop_schema, key, &prop_pointer)?;
                let required: bool = schema.is_required(key);
                let nullable: bool = resolved.nullable
                    || (!required && self.settings.generate_optional_properties_as_nullable);

                let mut base: String = naming::to_property_name(key);
                if base == name {
                    base.push_str("Value");
                }
                properties.push(PropertyDef {
                    name: members.claim(&base),
                    json_key: key.clone(),
                    schema: prop_schema,
                    type_ref: resolved.type_ref,
                    required,
                    nullable,
                });
            }
        }

        self.types.insert(
            name.clone(),
            TypeDef::Class(ClassDef {
                name,
                schema,
                properties,
                extension_data,
                disallow_unmapped,
            }),
        );
        Ok(())
    }

    fn collect_enum(
        &mut self,
        schema: &'a JsonSchema,
        name: String,
        pointer: &str,
    ) -> Result<(), JsonSchemaGenError> {
        let values: &[serde_json::Value] = schema.r#enum.as_deref().unwrap_or_default();
        let flags: bool = self.settings.enforce_flag_enums || schema.enum_flags == Some(true);

        let members: Vec<EnumMember> = match classify_enum(values, pointer)?.0 {
            EnumValues::Strings(mut strings) => {
                // Deduplicate and sort for determinism
                strings.sort();
                strings.dedup();
                if flags && strings.len() > 31 {
                    return Err(JsonSchemaGenError::GenericError(format!(
                        "Flag enum '{name}' at '#{pointer}' has {} members; at most 31 fit in an int",
                        strings.len()
                    )));
                }
                let base_names: Vec<String> = strings
                    .iter()
                    .map(String::as_str)
                    .map(naming::to_enum_member_name)
                    .collect();
                naming::disambiguate(&base_names)
                    .into_iter()
                    .zip(strings)
                    .zip(0_i64..)
                    .map(|((member_name, json_value), index)| EnumMember {
                        name: member_name,
                        json_value: Some(json_value),
                        value: if flags { 1 << index } else { index },
                    })
                    .collect()
            }
            EnumValues::Integers(mut integers) => {
                integers.sort_unstable();
                integers.dedup();
                integers
                    .into_iter()
                    .map(|value| EnumMember {
                        name: naming::to_integer_member_name(value),
                        json_value: None,
                        value,
                    })
                    .collect()
            }
            EnumValues::Empty => Vec::new(),
        };

        let long_backed: bool = schema.format.as_deref() == Some("int64")
            || members.iter().any(|m| i32::try_from(m.value).is_err());

        self.types.insert(
            name.clone(),
            TypeDef::Enum(EnumDef {
                name,
                schema,
                members,
                flags,
                long_backed,
            }),
        );
        Ok(())
    }

    /// Resolve the C# type for a property, array item, or dictionary value schema.
    /// `hint` names any nested class or enum that has no `title`.
    fn resolve_type(
        &mut self,
        schema: &'a JsonSchema,
        hint: &str,
        pointer: &str,
    ) -> Result<Resolved, JsonSchemaGenError> {
        check_pattern(schema, pointer)?;

        if let Some(ref reference) = schema.reference {
            return self.resolve_reference(reference, hint, pointer);
        }

        let (primary, type_nullable) = effective_type(schema, pointer)?;

        // Check for enum before type match
        if let Some(ref values) = schema.r#enum {
            let (classified, has_null) = classify_enum(values, pointer)?;
            if !matches!(classified, EnumValues::Empty) {
                let name: String = self
                    .scope
                    .claim(&naming::type_name_from_title(schema.title.as_deref(), hint));
                self.collect_enum(schema, name.clone(), pointer)?;
                return Ok(Resolved {
                    type_ref: TypeRef::Enum(name),
                    nullable: has_null || type_nullable,
                });
            }
        }

        let type_ref: TypeRef = match primary {
            Some("string") => TypeRef::Builtin(string_type(schema.format.as_deref())),
            Some("integer") => TypeRef::Builtin(choose_integer_type(schema)),
            Some("number") => TypeRef::Builtin(choose_number_type(schema)),
            Some("boolean") => TypeRef::Builtin("bool"),
            Some("array") => match schema.items {
                Some(ref items) => {
                    let items_pointer: String = json_pointer::format(pointer, "items");
                    let item: Resolved = self.resolve_type(items, hint, &items_pointer)?;
                    TypeRef::Array(Box::new(item.type_ref))
                }
                None => TypeRef::Array(Box::new(TypeRef::Any)),
            },
            Some("object") => self.resolve_object(schema, hint, pointer)?,
            _ => TypeRef::Any,
        };
        Ok(Resolved {
            type_ref,
            nullable: type_nullable,
        })
    }

    fn resolve_object(
        &mut self,
        schema: &'a JsonSchema,
        hint: &str,
        pointer: &str,
    ) -> Result<TypeRef, JsonSchemaGenError> {
        if is_class_schema(schema) {
            let name: String = self
                .scope
                .claim(&naming::type_name_from_title(schema.title.as_deref(), hint));
            self.collect_class(schema, name.clone(), pointer)?;
            return Ok(TypeRef::Class(name));
        }
        match schema.additional_properties {
            Some(AdditionalProperties::Schema(ref value_schema)) => {
                let value_pointer: String = json_pointer::format(pointer, "additionalProperties");
                let value_hint: String = format!("{hint}Value");
                let value: Resolved = self.resolve_type(value_schema, &value_hint, &value_pointer)?;
                Ok(TypeRef::Map(Box::new(value.type_ref)))
            }
            Some(AdditionalProperties::Bool(true)) => Ok(TypeRef::Map(Box::new(TypeRef::Any))),
            _ => Ok(TypeRef::Any),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: &str,
        hint: &str,
        pointer: &str,
    ) -> Result<Resolved, JsonSchemaGenError> {
        let Some(fragment) = reference.strip_prefix('#') else {
            return Err(JsonSchemaGenError::UnsupportedReference {
                pointer: pointer.to_string(),
                reference: reference.to_string(),
            });
        };
        let unresolved = || JsonSchemaGenError::UnresolvedReference {
            pointer: pointer.to_string(),
            reference: reference.to_string(),
        };
        let segments: Vec<String> = json_pointer::parse(fragment).ok_or_else(unresolved)?;
        let canonical: String = segments
            .iter()
            .fold(String::new(), |acc, segment| json_pointer::format(&acc, segment));

        if let Some(named) = self.named.get(&canonical) {
            let type_ref: TypeRef = named.type_ref.clone();
            let (_, nullable) = effective_type(named.schema, &canonical)?;
            return Ok(Resolved { type_ref, nullable });
        }

        let root: &'a JsonSchema = self.root;
        let target: &'a JsonSchema = root.resolve_pointer(&segments).ok_or_else(unresolved)?;

        // Register object targets before collecting them so recursive refs find the name.
        let (primary, nullable) = effective_type(target, &canonical)?;
        if target.reference.is_none()
            && target.r#enum.is_none()
            && primary == Some("object")
            && is_class_schema(target)
        {
            let name: String = self
                .scope
                .claim(&naming::type_name_from_title(target.title.as_deref(), hint));
            self.named.insert(
                canonical.clone(),
                NamedType {
                    type_ref: TypeRef::Class(name.clone()),
                    schema: target,
                },
            );
            tracing::debug!(%reference, %pointer, class = %name, "registered $ref target as class");
            self.collect_class(target, name.clone(), &canonical)?;
            return Ok(Resolved {
                type_ref: TypeRef::Class(name),
                nullable,
            });
        }

        if !self.resolving.insert(canonical.clone()) {
            return Err(JsonSchemaGenError::CircularReference {
                pointer: pointer.to_string(),
                reference: reference.to_string(),
            });
        }
        tracing::debug!(%reference, %pointer, "resolving $ref inline");
        let resolved: Result<Resolved, JsonSchemaGenError> =
            self.resolve_type(target, hint, &canonical);
        self.resolving.remove(&canonical);
        let resolved: Resolved = resolved?;

        // Later references to the same location reuse the type instead of emitting a copy.
        if matches!(resolved.type_ref, TypeRef::Class(_) | TypeRef::Enum(_)) {
            self.named.insert(
                canonical,
                NamedType {
                    type_ref: resolved.type_ref.clone(),
                    schema: target,
                },
            );
        }
        Ok(resolved)
    }
}

/// Escape a string for use inside a C# regular string literal.
fn escape_csharp_string(s: &str) -> String {
    let mut out: String = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a string for use inside a C# verbatim (`@"..."`) string literal.
fn escape_csharp_verbatim(s: &str) -> String {
    s.replace('"', "\"\"")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Normalize description: trim and treat empty/whitespace as None.
fn normalize_description(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

/// XML doc comment lines from a description, or nothing when there is none.
fn doc_comment_lines(description: Option<&str>, indent: &str) -> Vec<String> {
    let Some(desc) = normalize_description(description) else {
        return Vec::new();
    };
    let mut lines: Vec<String> = vec![format!("{indent}/// <summary>")];
    lines.extend(
        desc.lines()
            .map(|line| format!("{indent}/// {}", escape_xml(line.trim_end()))),
    );
    lines.push(format!("{indent}/// </summary>"));
    lines
}

/// Emits collected types as C# source.
struct Emitter<'s, 'a> {
    settings: &'s CSharpGeneratorSettings,
    types: &'s BTreeMap<String, TypeDef<'a>>,
}

impl Emitter<'_, '_> {
    fn is_immutable(&self, type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Array(_) => self.settings.generate_immutable_array_properties,
            TypeRef::Map(_) => self.settings.generate_immutable_dictionary_properties,
            _ => false,
        }
    }

    fn render_type(&self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Builtin(name) => (*name).to_string(),
            TypeRef::Class(name) | TypeRef::Enum(name) => name.clone(),
            TypeRef::Any => "object".to_string(),
            TypeRef::Array(item) => {
                let item: String = self.render_type(item);
                if self.settings.generate_immutable_array_properties {
                    format!("System.Collections.Generic.IReadOnlyList<{item}>")
                } else {
                    format!("System.Collections.Generic.ICollection<{item}>")
                }
            }
            TypeRef::Map(value) => {
                let value: String = self.render_type(value);
                if self.settings.generate_immutable_dictionary_properties {
                    format!("System.Collections.Generic.IReadOnlyDictionary<string, {value}>")
                } else {
                    format!("System.Collections.Generic.IDictionary<string, {value}>")
                }
            }
        }
    }

    /// Render the schema's `default` as a C# literal of the property's type.
    /// Returns None if there is no default or it has no literal form for that type.
    fn default_literal(&self, property: &PropertyDef<'_>) -> Option<String> {
        let dv: &serde_json::Value = property.schema.default.value()?;
        match &property.type_ref {
            TypeRef::Builtin("bool") => dv.as_bool().map(|b| b.to_string()),
            TypeRef::Builtin("int") => dv
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(|n| n.to_string()),
            TypeRef::Builtin("long") => dv.as_i64().map(|n| format!("{n}L")),
            TypeRef::Builtin("double") => dv.as_number().map(ToString::to_string),
            TypeRef::Builtin("float") => dv.as_number().map(|n| format!("{n}f")),
            TypeRef::Builtin("decimal") => dv.as_number().map(|n| format!("{n}m")),
            TypeRef::Builtin("string") => dv
                .as_str()
                .map(|s| format!("\"{}\"", escape_csharp_string(s))),
            TypeRef::Enum(type_name) => {
                let Some(TypeDef::Enum(enum_def)) = self.types.get(type_name) else {
                    return None;
                };
                let member: &EnumMember = enum_def.members.iter().find(|m| match dv {
                    serde_json::Value::String(s) => m.json_value.as_deref() == Some(s.as_str()),
                    serde_json::Value::Number(n) => {
                        m.json_value.is_none() && n.as_i64() == Some(m.value)
                    }
                    _ => false,
                })?;
                Some(format!("{type_name}.{}", member.name))
            }
            _ => None,
        }
    }

    /// Initializer for a property: its default when enabled, else an empty collection
    /// for non-nullable sequence and dictionary properties.
    fn initializer(&self, property: &PropertyDef<'_>) -> Option<String> {
        if self.settings.generate_default_values
            && let Some(literal) = self.default_literal(property)
        {
            return Some(literal);
        }
        if property.nullable {
            return None;
        }
        match &property.type_ref {
            TypeRef::Array(item) => {
                let item: String = self.render_type(item);
                if self.settings.generate_immutable_array_properties {
                    Some(format!("System.Array.Empty<{item}>()"))
                } else {
                    Some(format!("new System.Collections.ObjectModel.Collection<{item}>()"))
                }
            }
            TypeRef::Map(value) => {
                let value: String = self.render_type(value);
                Some(format!(
                    "new System.Collections.Generic.Dictionary<string, {value}>()"
                ))
            }
            _ => None,
        }
    }

    fn json_property_attributes(&self, property: &PropertyDef<'_>) -> Vec<String> {
        let key: String = escape_csharp_string(&property.json_key);
        let optional_nullable: bool = !property.required && property.nullable;
        match self.settings.json_library {
            CSharpJsonLibrary::SystemTextJson => {
                let mut lines: Vec<String> = vec![format!(
                    "{MEMBER_INDENT}[System.Text.Json.Serialization.JsonPropertyName(\"{key}\")]"
                )];
                if property.required && !self.settings.use_required_keyword {
                    lines.push(format!(
                        "{MEMBER_INDENT}[System.Text.Json.Serialization.JsonRequired]"
                    ));
                }
                if optional_nullable {
                    lines.push(format!(
                        "{MEMBER_INDENT}[System.Text.Json.Serialization.JsonIgnore(Condition = System.Text.Json.Serialization.JsonIgnoreCondition.WhenWritingNull)]"
                    ));
                }
                lines
            }
            CSharpJsonLibrary::NewtonsoftJson => {
                let required: &str = match (property.required, property.nullable) {
                    (true, false) => "Always",
                    (true, true) => "AllowNull",
                    (false, false) => "DisallowNull",
                    (false, true) => "Default",
                };
                let null_handling: &str = if optional_nullable {
                    ", NullValueHandling = Newtonsoft.Json.NullValueHandling.Ignore"
                } else {
                    ""
                };
                vec![format!(
                    "{MEMBER_INDENT}[Newtonsoft.Json.JsonProperty(\"{key}\", Required = Newtonsoft.Json.Required.{required}{null_handling})]"
                )]
            }
        }
    }

    fn data_annotation_attributes(property: &PropertyDef<'_>) -> Vec<String> {
        const ANNOTATIONS: &str = "System.ComponentModel.DataAnnotations";
        let schema: &JsonSchema = property.schema;
        let mut lines: Vec<String> = Vec::new();

        if property.required && !property.nullable {
            if property.type_ref == TypeRef::Builtin("string") {
                lines.push(format!(
                    "{MEMBER_INDENT}[{ANNOTATIONS}.Required(AllowEmptyStrings = true)]"
                ));
            } else {
                lines.push(format!("{MEMBER_INDENT}[{ANNOTATIONS}.Required]"));
            }
        }

        match &property.type_ref {
            TypeRef::Builtin("string") => match (schema.min_length, schema.max_length) {
                (Some(min), Some(max)) => lines.push(format!(
                    "{MEMBER_INDENT}[{ANNOTATIONS}.StringLength({max}, MinimumLength = {min})]"
                )),
                (None, Some(max)) => {
                    lines.push(format!("{MEMBER_INDENT}[{ANNOTATIONS}.StringLength({max})]"));
                }
                (Some(min), None) => {
                    lines.push(format!("{MEMBER_INDENT}[{ANNOTATIONS}.MinLength({min})]"));
                }
                (None, None) => {}
            },
            TypeRef::Builtin(name @ ("int" | "long" | "double" | "float" | "decimal")) => {
                if schema.minimum.is_some() || schema.maximum.is_some() {
                    let bound_type: &str = if matches!(*name, "int" | "long") {
                        *name
                    } else {
                        "double"
                    };
                    let min: String = schema
                        .minimum
                        .as_ref()
                        .map_or_else(|| format!("{bound_type}.MinValue"), ToString::to_string);
                    let max: String = schema
                        .maximum
                        .as_ref()
                        .map_or_else(|| format!("{bound_type}.MaxValue"), ToString::to_string);
                    lines.push(format!("{MEMBER_INDENT}[{ANNOTATIONS}.Range({min}, {max})]"));
                }
            }
            TypeRef::Array(_) => {
                if let Some(min) = schema.min_items {
                    lines.push(format!("{MEMBER_INDENT}[{ANNOTATIONS}.MinLength({min})]"));
                }
                if let Some(max) = schema.max_items {
                    lines.push(format!("{MEMBER_INDENT}[{ANNOTATIONS}.MaxLength({max})]"));
                }
            }
            _ => {}
        }

        if let Some(ref pattern) = schema.pattern {
            lines.push(format!(
                "{MEMBER_INDENT}[{ANNOTATIONS}.RegularExpression(@\"{}\")]",
                escape_csharp_verbatim(pattern)
            ));
        }
        lines
    }

    fn property_lines(&self, property: &PropertyDef<'_>) -> Vec<String> {
        let mut lines: Vec<String> =
            doc_comment_lines(property.schema.description.as_deref(), MEMBER_INDENT);
        lines.extend(self.json_property_attributes(property));
        if self.settings.generate_data_annotations {
            lines.extend(Self::data_annotation_attributes(property));
        }

        let modifier: &str = if property.required && self.settings.use_required_keyword {
            "required "
        } else {
            ""
        };
        let nullable_marker: &str = if property.nullable { "?" } else { "" };
        let type_str: String = self.render_type(&property.type_ref);
        let accessors: &str = if self.is_immutable(&property.type_ref) {
            "{ get; init; }"
        } else {
            "{ get; set; }"
        };
        let declaration: String = format!(
            "{MEMBER_INDENT}public {modifier}{type_str}{nullable_marker} {} {accessors}",
            property.name
        );
        match self.initializer(property) {
            Some(init) => lines.push(format!("{declaration} = {init};")),
            None => lines.push(declaration),
        }
        lines
    }

    fn extension_data_lines(&self) -> Vec<String> {
        let attribute: &str = match self.settings.json_library {
            CSharpJsonLibrary::SystemTextJson => "System.Text.Json.Serialization.JsonExtensionData",
            CSharpJsonLibrary::NewtonsoftJson => "Newtonsoft.Json.JsonExtensionData",
        };
        vec![
            format!("{MEMBER_INDENT}[{attribute}]"),
            format!(
                "{MEMBER_INDENT}public System.Collections.Generic.IDictionary<string, object> AdditionalProperties {{ get; set; }} = new System.Collections.Generic.Dictionary<string, object>();"
            ),
        ]
    }

    fn json_method_blocks(&self, class_name: &str) -> Vec<Vec<String>> {
        let (serialize, deserialize): (&str, &str) = match self.settings.json_library {
            CSharpJsonLibrary::SystemTextJson => (
                "System.Text.Json.JsonSerializer.Serialize(this)",
                "System.Text.Json.JsonSerializer.Deserialize",
            ),
            CSharpJsonLibrary::NewtonsoftJson => (
                "Newtonsoft.Json.JsonConvert.SerializeObject(this)",
                "Newtonsoft.Json.JsonConvert.DeserializeObject",
            ),
        };
        vec![
            vec![
                format!("{MEMBER_INDENT}public string ToJson()"),
                format!("{MEMBER_INDENT}{{"),
                format!("{BODY_INDENT}return {serialize};"),
                format!("{MEMBER_INDENT}}}"),
            ],
            vec![
                format!("{MEMBER_INDENT}public static {class_name}? FromJson(string data)"),
                format!("{MEMBER_INDENT}{{"),
                format!("{BODY_INDENT}return {deserialize}<{class_name}>(data);"),
                format!("{MEMBER_INDENT}}}"),
            ],
        ]
    }

    fn class_lines(&self, class_def: &ClassDef<'_>) -> Vec<String> {
        let mut lines: Vec<String> =
            doc_comment_lines(class_def.schema.description.as_deref(), TYPE_INDENT);
        if class_def.disallow_unmapped {
            lines.push(match self.settings.json_library {
                CSharpJsonLibrary::SystemTextJson => format!(
                    "{TYPE_INDENT}[System.Text.Json.Serialization.JsonUnmappedMemberHandling(System.Text.Json.Serialization.JsonUnmappedMemberHandling.Disallow)]"
                ),
                CSharpJsonLibrary::NewtonsoftJson => format!(
                    "{TYPE_INDENT}[Newtonsoft.Json.JsonObject(MissingMemberHandling = Newtonsoft.Json.MissingMemberHandling.Error)]"
                ),
            });
        }
        lines.push(format!("{TYPE_INDENT}public partial class {}", class_def.name));
        lines.push(format!("{TYPE_INDENT}{{"));

        let mut members: Vec<Vec<String>> = class_def
            .properties
            .iter()
            .map(|p| self.property_lines(p))
            .collect();
        if class_def.extension_data {
            members.push(self.extension_data_lines());
        }
        if self.settings.generate_json_methods {
            members.extend(self.json_method_blocks(&class_def.name));
        }
        lines.extend(join_blocks(members));

        lines.push(format!("{TYPE_INDENT}}}"));
        lines
    }

    fn enum_lines(&self, enum_def: &EnumDef<'_>) -> Vec<String> {
        let string_valued: bool = enum_def.members.iter().any(|m| m.json_value.is_some());
        let mut lines: Vec<String> =
            doc_comment_lines(enum_def.schema.description.as_deref(), TYPE_INDENT);
        if enum_def.flags {
            lines.push(format!("{TYPE_INDENT}[System.Flags]"));
        }
        if string_valued {
            lines.push(match self.settings.json_library {
                CSharpJsonLibrary::SystemTextJson => format!(
                    "{TYPE_INDENT}[System.Text.Json.Serialization.JsonConverter(typeof(System.Text.Json.Serialization.JsonStringEnumConverter))]"
                ),
                CSharpJsonLibrary::NewtonsoftJson => format!(
                    "{TYPE_INDENT}[Newtonsoft.Json.JsonConverter(typeof(Newtonsoft.Json.Converters.StringEnumConverter))]"
                ),
            });
        }
        let underlying: &str = if enum_def.long_backed { " : long" } else { "" };
        lines.push(format!(
            "{TYPE_INDENT}public enum {}{underlying}",
            enum_def.name
        ));
        lines.push(format!("{TYPE_INDENT}{{"));

        let members: Vec<Vec<String>> = enum_def
            .members
            .iter()
            .map(|member| {
                let mut member_lines: Vec<String> = Vec::new();
                if let Some(ref json_value) = member.json_value {
                    let escaped: String = escape_csharp_string(json_value);
                    member_lines.push(match self.settings.json_library {
                        CSharpJsonLibrary::SystemTextJson => format!(
                            "{MEMBER_INDENT}[System.Text.Json.Serialization.JsonStringEnumMemberName(\"{escaped}\")]"
                        ),
                        CSharpJsonLibrary::NewtonsoftJson => format!(
                            "{MEMBER_INDENT}[System.Runtime.Serialization.EnumMember(Value = \"{escaped}\")]"
                        ),
                    });
                }
                member_lines.push(format!("{MEMBER_INDENT}{} = {},", member.name, member.value));
                member_lines
            })
            .collect();
        lines.extend(join_blocks(members));

        lines.push(format!("{TYPE_INDENT}}}"));
        lines
    }

    fn emit<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{FILE_HEADER}")?;
        writeln!(writer)?;
        writeln!(writer, "#nullable enable")?;
        writeln!(writer)?;
        writeln!(writer, "namespace {}", self.settings.namespace)?;
        writeln!(writer, "{{")?;
        let blocks: Vec<Vec<String>> = self
            .types
            .values()
            .map(|type_def| match type_def {
                TypeDef::Class(class_def) => self.class_lines(class_def),
                TypeDef::Enum(enum_def) => self.enum_lines(enum_def),
            })
            .collect();
        for line in join_blocks(blocks) {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer, "}}")?;
        Ok(())
    }
}

/// Flatten blocks of lines, separating consecutive blocks with one blank line.
fn join_blocks(blocks: Vec<Vec<String>>) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for (i, block) in blocks.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(block);
    }
    lines
}

/// A namespace is one or more `.`-separated identifiers.
fn validate_namespace(namespace: &str) -> Result<(), JsonSchemaGenError> {
    let valid: bool = namespace.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|first| first.is_alphabetic() || first == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
    });
    if valid {
        Ok(())
    } else {
        Err(JsonSchemaGenError::GenericError(format!(
            "Invalid namespace '{namespace}'"
        )))
    }
}

/// Generate C# classes from a parsed JSON Schema and write them to `writer`.
///
/// All schema errors are detected before anything is written.
///
/// # Errors
///
/// Returns `JsonSchemaGenError` if the namespace is not a valid C# namespace, a `$ref`
/// cannot be resolved, the schema uses an unsupported type or enum, a `pattern` does not
/// compile, there is nothing to generate, or writing to `writer` fails.
pub fn generate_to_writer<W: Write>(
    schema: &JsonSchema,
    writer: &mut W,
    settings: &CSharpGeneratorSettings,
) -> Result<(), JsonSchemaGenError> {
    validate_namespace(&settings.namespace)?;

    let mut collector = Collector::new(schema, settings);
    collector.register_named_types()?;
    collector.collect_named_types()?;

    if collector.types.is_empty() {
        return Err(JsonSchemaGenError::GenericError(
            "No types to generate: the root schema is neither an object nor an enum and has no definitions"
                .to_string(),
        ));
    }
    tracing::debug!(
        types = collector.types.len(),
        namespace = %settings.namespace,
        library = %settings.json_library,
        "collected types"
    );

    let emitter = Emitter {
        settings,
        types: &collector.types,
    };
    emitter.emit(writer)?;
    Ok(())
}
