use esfp_ast::EsfpSyntax;
use esfp_transform::{preset::esfp_preset, Pipeline, TransformStage};
use serde::Deserialize;

/// Everything one invocation needs besides its input.
///
/// Immutable while an invocation runs. Share it behind an `Arc` to run many
/// invocations concurrently.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub pipeline: Pipeline,
    pub emit_source_map: bool,
    /// Diagnostic label for errors and the source map. Never read from disk.
    pub source_name: String,
    pub syntax: EsfpSyntax,
}

impl PipelineConfig {
    /// An empty stage list, no source map, dialect inferred from the name.
    pub fn new(source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();
        Self {
            pipeline: Pipeline::new(),
            emit_source_map: false,
            syntax: EsfpSyntax::for_source_name(&source_name),
            source_name,
        }
    }

    /// The default preset, with the source map toggled by `_flags.debug`.
    pub fn from_options(source_name: impl Into<String>, options: &TransformOptions) -> Self {
        let mut config = Self::new(source_name)
            .with_pipeline(esfp_preset())
            .with_source_map(options.flags.debug);
        if let Some(syntax) = options.syntax {
            config.syntax = syntax;
        }
        config
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_stage(mut self, stage: impl TransformStage + 'static) -> Self {
        self.pipeline = self.pipeline.with_stage(stage);
        self
    }

    pub fn with_source_map(mut self, emit_source_map: bool) -> Self {
        self.emit_source_map = emit_source_map;
        self
    }

    pub fn with_syntax(mut self, syntax: EsfpSyntax) -> Self {
        self.syntax = syntax;
        self
    }
}

/// Options object in the shape bundlers hand to transforms.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    #[serde(rename = "_flags")]
    pub flags: Flags,
    /// Overrides the dialect inferred from the file name.
    pub syntax: Option<EsfpSyntax>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Flags {
    /// Emit an inline source map.
    pub debug: bool,
}
