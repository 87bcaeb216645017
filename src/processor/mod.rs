//! The translation core: massage → scan/parse → generate.
pub mod body;
pub mod lexer;
pub mod massage;
pub mod parser;

use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use crate::model::{ShaderModel, ShaderStage};
use crate::writer::cg;
use massage::Massager;
use tracing::debug;

/// Massage and parse one source file into its model.
pub fn parse_source(
    source: &str,
    stage: ShaderStage,
    config: &TranslatorConfig,
) -> Result<ShaderModel, TranslateError> {
    let massaged =
        Massager::new(&config.replacements, config.position_output()).massage(source);
    debug!(%stage, "massaged source: {massaged}");

    let model = parser::parse(&massaged, stage)?;
    debug!(
        attributes = model.attributes.len(),
        uniforms = model.uniforms.len(),
        varyings = model.varyings.len(),
        functions = model.functions.len(),
        "parsed shader model"
    );
    Ok(model)
}

/// Translate GLSL source text into Cg source text.
pub fn run(
    source: &str,
    stage: ShaderStage,
    config: &TranslatorConfig,
) -> Result<String, TranslateError> {
    let model = parse_source(source, stage, config)?;
    cg::generate(&model, config)
}
