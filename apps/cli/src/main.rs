//! convgen - conversion code generator
//!
//! Usage:
//!   convgen generate convgen.yaml [--output src/generated] [--stdout]
//!   convgen check convgen.yaml

mod config;
mod logging;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use convgen_emit::emitters::rust::RustEmitter;
use convgen_emit::CodeGenerator;

use crate::config::Project;

#[derive(Parser, Debug)]
#[command(name = "convgen")]
#[command(about = "Generate type conversion functions from shape descriptions", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level for convgen crates (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate converter modules
    Generate {
        /// Project file (YAML or JSON)
        project: PathBuf,

        /// Output directory, overriding the project file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the generated modules to stdout instead of writing them
        #[arg(long)]
        stdout: bool,
    },
    /// Synthesize all converters and report errors without writing anything
    Check {
        /// Project file (YAML or JSON)
        project: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_path = match &cli.command {
        Command::Generate { project, .. } | Command::Check { project } => project,
    };
    let project = Project::load(project_path)?;

    let mut logging_config = project.logging.clone();
    if let Some(level) = &cli.log_level {
        logging_config.level = level.clone();
    }
    logging_config.json |= cli.log_json;
    logging::init_logging(&logging_config).context("Failed to initialize logging")?;

    let catalog = project.load_catalog()?;
    let converters = project.converter_configs();

    let codegen = CodeGenerator::from_catalog(&catalog, &converters)
        .context("synthesizing converters")?;

    match cli.command {
        Command::Check { .. } => {
            let functions: usize = codegen
                .file()
                .converters
                .iter()
                .map(|c| c.functions.len())
                .sum();
            tracing::info!(
                converters = codegen.file().converters.len(),
                functions,
                "check passed"
            );
            println!(
                "ok: {} converter(s), {} function(s)",
                codegen.file().converters.len(),
                functions
            );
        }
        Command::Generate { output, stdout, .. } => {
            let emitter = RustEmitter::new(project.emit.clone());
            let output_modules = codegen.emit(emitter).context("running Rust emitter")?;

            if stdout {
                let mut names: Vec<_> = output_modules.modules.keys().collect();
                names.sort();
                let mut out = std::io::stdout().lock();
                for name in names {
                    writeln!(out, "// ---- {} ----", name)?;
                    out.write_all(output_modules.modules[name].as_bytes())?;
                }
            } else {
                let output_dir = output.unwrap_or_else(|| project.output_dir());
                convgen_emit::utils::write_modules(&output_dir, &output_modules.modules)
                    .with_context(|| format!("writing modules to {}", output_dir.display()))?;
                tracing::info!(
                    modules = output_modules.modules.len(),
                    output = %output_dir.display(),
                    "generated converters"
                );
            }
        }
    }

    Ok(())
}
