use std::fmt;

use esfp_ast::{Position, SyntaxTree};

/// One named rewriting step over a [`SyntaxTree`].
///
/// Stages must not keep state between invocations: the same stage object is
/// shared by every pipeline run, possibly from several threads at once.
pub trait TransformStage: Send + Sync {
    fn name(&self) -> &str;

    fn transform(&self, tree: SyntaxTree) -> Result<SyntaxTree, StageError>;
}

/// A stage rejected or could not process its input tree.
#[derive(Debug)]
pub struct StageError {
    pub stage: String,
    pub cause: anyhow::Error,
    pub position: Option<Position>,
}

impl StageError {
    pub fn new(stage: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            stage: stage.into(),
            cause: cause.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }

    /// Attribute the error to a different stage.
    pub fn relabel(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "[{}] {}: {}", self.stage, position, self.cause),
            None => write!(f, "[{}] {}", self.stage, self.cause),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// A stage backed by a closure. See [`stage_fn`].
pub struct FnStage<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a [`TransformStage`].
///
/// Errors returned by the closure are attributed to `name`.
pub fn stage_fn<F>(name: impl Into<String>, f: F) -> FnStage<F>
where
    F: Fn(SyntaxTree) -> anyhow::Result<SyntaxTree> + Send + Sync,
{
    FnStage {
        name: name.into(),
        f,
    }
}

impl<F> TransformStage for FnStage<F>
where
    F: Fn(SyntaxTree) -> anyhow::Result<SyntaxTree> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, tree: SyntaxTree) -> Result<SyntaxTree, StageError> {
        (self.f)(tree).map_err(|cause| StageError::new(self.name.clone(), cause))
    }
}

impl<F> fmt::Debug for FnStage<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage").field("name", &self.name).finish()
    }
}
