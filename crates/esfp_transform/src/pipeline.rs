use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use esfp_ast::{EsfpSyntax, SyntaxTree};
use esfp_parser::SyntaxError;
use esfp_source::SourceBuffer;
use swc_common::Span;
use swc_ecma_visit::{VisitMut, VisitMutWith};
use tracing::{debug, debug_span, trace, Level};

use crate::stage::{StageError, TransformStage};

/// Parsing or one of the stages failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// An ordered list of transform stages.
///
/// Cloning is cheap and a pipeline holds no per-run state, so one instance can
/// serve any number of concurrent invocations.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn TransformStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage. Stages run in the order they were added.
    pub fn with_stage(mut self, stage: impl TransformStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn push(&mut self, stage: Arc<dyn TransformStage>) {
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[Arc<dyn TransformStage>] {
        &self.stages
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Parse `buffer` and apply every stage to the resulting tree.
    pub fn run(
        &self,
        buffer: &SourceBuffer,
        syntax: &EsfpSyntax,
    ) -> Result<SyntaxTree, PipelineError> {
        let tree = esfp_parser::parse(buffer, syntax)?;
        Ok(self.apply(tree)?)
    }

    /// Apply every stage in order, aborting on the first failure.
    pub fn apply(&self, mut tree: SyntaxTree) -> Result<SyntaxTree, StageError> {
        for stage in &self.stages {
            let name = stage.name();
            let span = debug_span!("stage", stage = name);
            let _enter = span.enter();

            let started = Instant::now();
            tree = match stage.transform(tree) {
                Ok(next) => next,
                Err(err) if err.stage == name => return Err(err),
                Err(err) => return Err(err.relabel(name)),
            };
            let synthetic = tree.synthetic_span();
            tree.module.visit_mut_with(&mut MarkSynthetic(synthetic));
            debug!(elapsed_us = started.elapsed().as_micros() as u64, "stage finished");

            if tracing::enabled!(Level::TRACE) {
                if let Ok(json) = tree.dump_json() {
                    trace!(tree = %json, "tree after stage");
                }
            }
        }
        Ok(tree)
    }
}

/// Gives nodes a stage built with `DUMMY_SP` the tree's synthetic span, so
/// they map to no source instead of inheriting the previous mapping.
struct MarkSynthetic(Span);

impl VisitMut for MarkSynthetic {
    fn visit_mut_span(&mut self, span: &mut Span) {
        if span.is_dummy() {
            *span = self.0;
        }
    }
}

impl FromIterator<Arc<dyn TransformStage>> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Arc<dyn TransformStage>>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
