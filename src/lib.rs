pub mod ast;
pub mod clause;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod display;
pub mod duration;
pub mod value;

use anyhow::Context;
use log::{debug, info};
use std::io::Read;
use std::path::Path;

pub use ast::{AstError, Node, parse_ast};
pub use clause::{Clause, Occur, RangeBound};
pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use compiler::{CompilationResult, CompileError, CompileOptions, FieldUsage, FilterCompiler};
pub use value::Value;

/// Read an AST document from a file, or from stdin when the path is `-`
fn read_ast(path: &Path) -> anyhow::Result<Node> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read AST from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read AST file '{}'", path.display()))?
    };

    parse_ast(&raw).with_context(|| format!("Failed to decode AST '{}'", path.display()))
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
    info!("Output written to {}", path.display());
    Ok(())
}

pub fn run(cli: &cli::Cli) -> anyhow::Result<()> {
    let app_config = config::load_config(cli.config.as_deref())
        .context("Failed to load config")?;
    let options = app_config.compile_options(cli.skip_field.as_deref(), cli.no_skip_field);
    cli.color.apply();

    debug!("Config profile: {}", app_config.profile_name);
    if let Some(config_path) = &cli.config {
        debug!("Config file: {}", config_path.display());
    }
    let compiler = FilterCompiler::new(options);
    debug!("Skip field: {:?}", compiler.options().skip_field);

    let (file, fields_only) = match &cli.command {
        Commands::Compile { file } => (file, false),
        Commands::Fields { file } => (file, true),
    };

    let node = read_ast(file)?;
    debug!("Decoded {} root from {}", node.kind(), file.display());
    let result = compiler
        .compile(&node)
        .with_context(|| format!("Failed to compile filter '{}'", file.display()))?;
    debug!(
        "Compiled filter referencing {} field(s): {:?}",
        result.filtered_fields.len(),
        result.filtered_fields
    );
    if result.skip_applied() {
        debug!("Compiled to match_all: {:?}", result.skipped_fields);
    }

    let rendered = match (cli.format, fields_only) {
        (OutputFormat::Json, false) => display::format_compilation_json(&result, cli.compact),
        (OutputFormat::Text, false) => display::format_compilation_text(&result),
        (OutputFormat::Json, true) => display::format_field_usage_json(&result, cli.compact),
        (OutputFormat::Text, true) => display::format_field_usage_text(&result),
    };

    println!("{}", rendered.trim_end());
    if let Some(path) = &cli.output {
        write_output_file(path, &rendered)?;
    }

    Ok(())
}
