//! Binary to generate C# classes from a JSON Schema file.
//!
//! Usage: `json-schema-cs --input schema.json [--namespace My.Models] [--jsonLibrary NewtonsoftJson]`
//!
//! Writes `schema.cs` next to the input file. Run with `--help` for every flag.

use std::io::stdout;
use std::process;

use json_schema_cs_cli::{init_logging, run};

fn main() {
    init_logging();
    process::exit(run(std::env::args_os(), &mut stdout()));
}
