//! Settings for C# code generation.

use std::error;
use std::fmt;
use std::str::FromStr;

/// Namespace used when the caller does not pick one.
pub const DEFAULT_NAMESPACE: &str = "GeneratedNamespace";

/// Serialization library the generated classes are annotated for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CSharpJsonLibrary {
    /// `Newtonsoft.Json` (`JsonProperty`, `JsonConvert`).
    NewtonsoftJson,
    /// `System.Text.Json` (`JsonPropertyName`, `JsonSerializer`).
    #[default]
    SystemTextJson,
}

impl CSharpJsonLibrary {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewtonsoftJson => "NewtonsoftJson",
            Self::SystemTextJson => "SystemTextJson",
        }
    }
}

impl fmt::Display for CSharpJsonLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON library name that is not one of the supported literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJsonLibraryError {
    pub value: String,
}

impl error::Error for UnknownJsonLibraryError {}

impl fmt::Display for UnknownJsonLibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid JSON library '{}' specified. Use 'NewtonsoftJson' or 'SystemTextJson'.",
            self.value
        )
    }
}

impl FromStr for CSharpJsonLibrary {
    type Err = UnknownJsonLibraryError;

    /// Case-sensitive: only the exact variant names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NewtonsoftJson" => Ok(Self::NewtonsoftJson),
            "SystemTextJson" => Ok(Self::SystemTextJson),
            other => Err(UnknownJsonLibraryError {
                value: other.to_string(),
            }),
        }
    }
}

/// Settings that control code generation behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools)]
pub struct CSharpGeneratorSettings {
    /// Namespace wrapping every generated type.
    pub namespace: String,

    /// Emit `System.ComponentModel.DataAnnotations` attributes
    /// (`Required`, `StringLength`, `Range`, `RegularExpression`, ...).
    pub generate_data_annotations: bool,

    /// Emit `ToJson()` / `FromJson(string)` helpers on every class.
    pub generate_json_methods: bool,

    /// Type array properties as `IReadOnlyList<T>` with an `init` accessor.
    pub generate_immutable_array_properties: bool,

    /// Type map properties as `IReadOnlyDictionary<string, T>` with an `init` accessor.
    pub generate_immutable_dictionary_properties: bool,

    /// Initialize properties from the schema's `default` keyword.
    pub generate_default_values: bool,

    /// Make properties missing from `required` nullable (`T?`).
    pub generate_optional_properties_as_nullable: bool,

    pub json_library: CSharpJsonLibrary,

    /// Mark required properties with the C# 11 `required` modifier.
    ///
    /// **Default: true.**
    pub use_required_keyword: bool,

    /// Emit every enum as a `[System.Flags]` enum, not only those marked `x-enumFlags`.
    pub enforce_flag_enums: bool,
}

impl Default for CSharpGeneratorSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            generate_data_annotations: false,
            generate_json_methods: false,
            generate_immutable_array_properties: false,
            generate_immutable_dictionary_properties: false,
            generate_default_values: false,
            generate_optional_properties_as_nullable: false,
            json_library: CSharpJsonLibrary::default(),
            use_required_keyword: true,
            enforce_flag_enums: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_library_parses_exact_names() {
        assert_eq!(
            "NewtonsoftJson".parse::<CSharpJsonLibrary>(),
            Ok(CSharpJsonLibrary::NewtonsoftJson)
        );
        assert_eq!(
            "SystemTextJson".parse::<CSharpJsonLibrary>(),
            Ok(CSharpJsonLibrary::SystemTextJson)
        );
    }

    #[test]
    fn json_library_parse_is_case_sensitive() {
        let err: UnknownJsonLibraryError = "systemtextjson"
            .parse::<CSharpJsonLibrary>()
            .expect_err("lowercase must be rejected");
        assert_eq!(err.value, "systemtextjson");
        assert_eq!(
            err.to_string(),
            "Invalid JSON library 'systemtextjson' specified. Use 'NewtonsoftJson' or 'SystemTextJson'."
        );
    }

    #[test]
    fn json_library_display_matches_parse_input() {
        for library in [
            CSharpJsonLibrary::NewtonsoftJson,
            CSharpJsonLibrary::SystemTextJson,
        ] {
            assert_eq!(library.to_string().parse::<CSharpJsonLibrary>(), Ok(library));
        }
    }

    #[test]
    fn defaults_are_false_except_required_keyword() {
        let settings = CSharpGeneratorSettings::default();
        assert_eq!(settings.namespace, "GeneratedNamespace");
        assert!(!settings.generate_data_annotations);
        assert!(!settings.generate_json_methods);
        assert!(!settings.generate_immutable_array_properties);
        assert!(!settings.generate_immutable_dictionary_properties);
        assert!(!settings.generate_default_values);
        assert!(!settings.generate_optional_properties_as_nullable);
        assert_eq!(settings.json_library, CSharpJsonLibrary::SystemTextJson);
        assert!(settings.use_required_keyword);
        assert!(!settings.enforce_flag_enums);
    }
}
