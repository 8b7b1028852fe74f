use clap::{ArgAction, Parser};
use json_schema_cs::{CSharpGeneratorSettings, DEFAULT_NAMESPACE, UnknownJsonLibraryError};

/// Command-line options for one generation run.
///
/// Boolean flags accept an optional value: `--flag` alone means `true`,
/// `--flag true` / `--flag false` set it explicitly.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "json-schema-cs",
    version,
    about = "Generate C# classes from JSON schema files"
)]
#[expect(clippy::struct_excessive_bools)]
pub struct GenerationOptions {
    /// The JSON schema file to generate C# classes from.
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    pub input: Option<String>,

    /// The namespace for the generated classes
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Generate data annotations
    #[arg(long = "generateDataAnnotations", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub generate_data_annotations: bool,

    /// Generate JSON methods
    #[arg(long = "generateJsonMethods", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub generate_json_methods: bool,

    /// Generate immutable array properties
    #[arg(long = "generateImmutableArrayProperties", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub generate_immutable_array_properties: bool,

    /// Generate immutable dictionary properties
    #[arg(long = "generateImmutableDictionaryProperties", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub generate_immutable_dictionary_properties: bool,

    /// Generate default values
    #[arg(long = "generateDefaultValues", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub generate_default_values: bool,

    /// Generate optional properties as nullable
    #[arg(long = "generateOptionalPropertiesAsNullable", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub generate_optional_properties_as_nullable: bool,

    /// The JSON library to use (`NewtonsoftJson` or `SystemTextJson`)
    // Kept as text: an unknown name is reported by the generation step, not rejected here.
    #[arg(long = "jsonLibrary", value_name = "LIBRARY", default_value = "SystemTextJson")]
    pub json_library: String,

    /// Use the C# 11 'required' keyword for required properties
    #[arg(long = "useRequiredKeyword", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = true)]
    pub use_required_keyword: bool,

    /// Enforce flag enums
    #[arg(long = "enforceFlagEnums", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set, default_value_t = false)]
    pub enforce_flag_enums: bool,
}

impl GenerationOptions {
    /// Build generator settings from these options.
    ///
    /// # Errors
    ///
    /// Returns `UnknownJsonLibraryError` if `json_library` is not exactly
    /// `NewtonsoftJson` or `SystemTextJson`.
    pub fn to_settings(&self) -> Result<CSharpGeneratorSettings, UnknownJsonLibraryError> {
        Ok(CSharpGeneratorSettings {
            namespace: self.namespace.clone(),
            generate_data_annotations: self.generate_data_annotations,
            generate_json_methods: self.generate_json_methods,
            generate_immutable_array_properties: self.generate_immutable_array_properties,
            generate_immutable_dictionary_properties: self.generate_immutable_dictionary_properties,
            generate_default_values: self.generate_default_values,
            generate_optional_properties_as_nullable: self.generate_optional_properties_as_nullable,
            json_library: self.json_library.parse()?,
            use_required_keyword: self.use_required_keyword,
            enforce_flag_enums: self.enforce_flag_enums,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use json_schema_cs::CSharpJsonLibrary;

    fn parse(args: &[&str]) -> GenerationOptions {
        GenerationOptions::try_parse_from(std::iter::once("json-schema-cs").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn command_definition_is_consistent() {
        GenerationOptions::command().debug_assert();
    }

    #[test]
    fn defaults_match_generator_defaults() {
        let options: GenerationOptions = parse(&[]);
        assert_eq!(options.input, None);
        assert_eq!(
            options.to_settings().expect("default library is valid"),
            CSharpGeneratorSettings::default()
        );
    }

    #[test]
    fn bare_bool_flag_means_true() {
        let options: GenerationOptions = parse(&["--generateJsonMethods", "--enforceFlagEnums"]);
        assert!(options.generate_json_methods);
        assert!(options.enforce_flag_enums);
        assert!(!options.generate_data_annotations);
    }

    #[test]
    fn bool_flag_takes_explicit_value() {
        let options: GenerationOptions = parse(&[
            "--useRequiredKeyword",
            "false",
            "--generateDefaultValues",
            "true",
        ]);
        assert!(!options.use_required_keyword);
        assert!(options.generate_default_values);
    }

    #[test]
    fn bool_flag_rejects_other_values() {
        let result = GenerationOptions::try_parse_from(["json-schema-cs", "--generateJsonMethods", "yes"]);
        assert!(result.is_err());
    }

    #[test]
    fn bare_input_is_empty() {
        let options: GenerationOptions = parse(&["--input"]);
        assert_eq!(options.input.as_deref(), Some(""));
    }

    #[test]
    fn every_flag_reaches_settings() {
        let options: GenerationOptions = parse(&[
            "--input",
            "schema.json",
            "--namespace",
            "Acme.Models",
            "--generateDataAnnotations",
            "--generateJsonMethods",
            "--generateImmutableArrayProperties",
            "--generateImmutableDictionaryProperties",
            "--generateDefaultValues",
            "--generateOptionalPropertiesAsNullable",
            "--jsonLibrary",
            "NewtonsoftJson",
            "--useRequiredKeyword",
            "false",
            "--enforceFlagEnums",
        ]);
        let expected = CSharpGeneratorSettings {
            namespace: "Acme.Models".to_string(),
            generate_data_annotations: true,
            generate_json_methods: true,
            generate_immutable_array_properties: true,
            generate_immutable_dictionary_properties: true,
            generate_default_values: true,
            generate_optional_properties_as_nullable: true,
            json_library: CSharpJsonLibrary::NewtonsoftJson,
            use_required_keyword: false,
            enforce_flag_enums: true,
        };
        assert_eq!(options.input.as_deref(), Some("schema.json"));
        assert_eq!(options.to_settings().expect("valid library"), expected);
    }

    #[test]
    fn unknown_json_library_parses_but_fails_settings() {
        let options: GenerationOptions = parse(&["--jsonLibrary", "Jackson"]);
        let err: UnknownJsonLibraryError = options.to_settings().expect_err("unknown library");
        assert_eq!(err.value, "Jackson");
    }
}
