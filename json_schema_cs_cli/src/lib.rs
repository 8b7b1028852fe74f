//! Command-line front end for `json-schema-cs`: read a JSON Schema file, write
//! the generated C# classes next to it.

mod error;
mod logging;
mod options;

pub use error::GenerateError;
pub use logging::init_logging;
pub use options::GenerationOptions;

use clap::Parser;
use json_schema_cs::{CSharpGeneratorSettings, FILE_EXTENSION, JsonSchema, generate_file};
use std::ffi::OsString;
use std::fmt::Arguments;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The run finished, whether or not generation itself succeeded.
pub const EXIT_SUCCESS: i32 = 0;

/// The input file was missing or does not exist.
pub const EXIT_USAGE: i32 = 1;

/// Parse `args` (program name first) and run one generation, printing user-facing
/// messages to `out`. Returns the process exit code.
///
/// Malformed arguments are reported by clap and yield clap's exit code.
pub fn run<I, T, W>(args: I, out: &mut W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    match GenerationOptions::try_parse_from(args) {
        Ok(options) => execute(&options, out),
        Err(e) => {
            if let Err(io_error) = e.print() {
                tracing::warn!(error = %io_error, "failed to print argument error");
            }
            e.exit_code()
        }
    }
}

/// Run one generation with already-parsed options.
///
/// Only a missing or nonexistent input returns [`EXIT_USAGE`]. Failures while
/// generating are printed and still return [`EXIT_SUCCESS`].
pub fn execute<W: Write>(options: &GenerationOptions, out: &mut W) -> i32 {
    let input: &str = options.input.as_deref().unwrap_or_default();
    if input.is_empty() {
        report(out, format_args!("Input is required."));
        return EXIT_USAGE;
    }
    let input_path: &Path = Path::new(input);
    if !input_path.is_file() {
        report(out, format_args!("Input '{input}' does not exist."));
        return EXIT_USAGE;
    }

    match attempt_generation(input_path, options) {
        Ok(output) => {
            tracing::info!(input, output = %output.display(), "generated C# source");
            report(out, format_args!("Generated C# classes for schema: {input}"));
        }
        Err(e) => {
            tracing::warn!(input, error = %e, "generation failed; exit status stays 0");
            report(out, format_args!("Error processing schema file '{input}': {e}"));
        }
    }
    EXIT_SUCCESS
}

/// Print one user-facing line. A failed write does not change the exit code,
/// so it is logged instead.
fn report<W: Write>(out: &mut W, message: Arguments<'_>) {
    if let Err(e) = writeln!(out, "{message}") {
        tracing::warn!(error = %e, "failed to write message");
    }
}

/// Read the schema at `input`, generate C#, and write it to [`output_path`].
/// Returns the path written.
///
/// # Errors
///
/// Returns `GenerateError::Schema` if the file cannot be read or parsed or the schema
/// cannot be generated, `GenerateError::Configuration` if the JSON library option is
/// unknown, and `GenerateError::Io` if the output file cannot be written.
pub fn attempt_generation(
    input: &Path,
    options: &GenerationOptions,
) -> Result<PathBuf, GenerateError> {
    let schema: JsonSchema = JsonSchema::from_file(input)?;
    let settings: CSharpGeneratorSettings = options.to_settings()?;
    let source: String = generate_file(&schema, &settings)?;

    let output: PathBuf = output_path(input);
    fs::write(&output, source)?;
    Ok(output)
}

/// The input path with its last extension replaced by `.cs`, in the same directory.
/// A file name that is only an extension, such as `.json`, becomes `.cs`.
#[must_use]
pub fn output_path(input: &Path) -> PathBuf {
    let extension_only: bool = input.extension().is_none()
        && input
            .file_name()
            .is_some_and(|name| name.as_encoded_bytes().starts_with(b"."));
    if extension_only {
        input.with_file_name(format!(".{FILE_EXTENSION}"))
    } else {
        input.with_extension(FILE_EXTENSION)
    }
}
