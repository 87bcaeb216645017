pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod processor;
pub mod writer;

pub use config::{ReplacementTable, TranslatorConfig};
pub use error::TranslateError;
pub use model::ShaderStage;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub fn run() -> Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Configure ──────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => config::load(path)?,
        None => TranslatorConfig::default(),
    };
    if let Some(mvp) = args.mvp {
        config.mvp_identifier = mvp;
    }
    config.rewrite_all_matrix_uniforms |= args.all_matrix_uniforms;

    // 2. ── Translate each file; one failure doesn't stop the batch ────
    let mut failed = 0;
    for input in &args.inputs {
        if let Err(e) = translate_file(input, args.out_dir.as_deref(), &config) {
            error!("{e:#}");
            failed += 1;
        }
    }

    // 3. ── Summary ────────────────────────────────────────────────────
    let total = args.inputs.len();
    info!("Translated {} of {} files", total - failed, total);
    if failed > 0 {
        bail!("{failed} of {total} files failed to translate");
    }
    Ok(())
}

/// Classify `input` by extension, translate it, and write the result next
/// to it (or into `out_dir`). Returns the output path.
pub fn translate_file(
    input: &Path,
    out_dir: Option<&Path>,
    config: &TranslatorConfig,
) -> Result<PathBuf> {
    let stage = ShaderStage::from_path(input)?;
    let output = stage.output_path(input, out_dir);
    translate(input, &output, stage, config)?;
    Ok(output)
}

/// Translate one GLSL file into one Cg file.
pub fn translate(
    input: &Path,
    output: &Path,
    stage: ShaderStage,
    config: &TranslatorConfig,
) -> Result<()> {
    info!("Loading file: {}", input.display());
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Reading {}", input.display()))?;

    let cg = processor::run(&source, stage, config)
        .with_context(|| format!("Translating {}", input.display()))?;

    writer::emit(&cg, output).with_context(|| format!("Writing {}", output.display()))?;
    info!("Translated {stage} shader to file: {}", output.display());
    Ok(())
}
