use esfp_codegen::TransformResult;
use esfp_source::{SourceAccumulator, SourceBuffer};

use crate::config::PipelineConfig;
use crate::error::TransformError;

/// Accumulate `chunks`, then parse, transform and generate in one call.
pub fn transform<I>(chunks: I, config: &PipelineConfig) -> Result<TransformResult, TransformError>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut accumulator = SourceAccumulator::new(config.source_name.clone());
    for chunk in chunks {
        accumulator.write(chunk.as_ref())?;
    }
    let buffer = accumulator.end()?;
    finalize(&buffer, config)
}

pub fn transform_str(source: &str, config: &PipelineConfig) -> Result<TransformResult, TransformError> {
    transform([source], config)
}

/// Parse → stages → generate, in that order.
pub(crate) fn finalize(
    buffer: &SourceBuffer,
    config: &PipelineConfig,
) -> Result<TransformResult, TransformError> {
    let tree = config.pipeline.run(buffer, &config.syntax)?;
    Ok(esfp_codegen::generate(&tree, config.emit_source_map)?)
}
