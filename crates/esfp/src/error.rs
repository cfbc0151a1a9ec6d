use esfp_ast::Position;
use esfp_codegen::GenerateError;
use esfp_parser::SyntaxError;
use esfp_source::StateError;
use esfp_transform::{PipelineError, StageError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Syntax,
    Stage,
    State,
    Generate,
}

/// The single error an invocation can end with.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::Syntax(_) => ErrorKind::Syntax,
            TransformError::Stage(_) => ErrorKind::Stage,
            TransformError::State(_) => ErrorKind::State,
            TransformError::Generate(_) => ErrorKind::Generate,
        }
    }

    /// Where in the source the error was detected, when known.
    pub fn position(&self) -> Option<Position> {
        match self {
            TransformError::Syntax(err) => Some(err.position),
            TransformError::Stage(err) => err.position,
            TransformError::State(_) | TransformError::Generate(_) => None,
        }
    }
}

impl From<PipelineError> for TransformError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Syntax(err) => TransformError::Syntax(err),
            PipelineError::Stage(err) => TransformError::Stage(err),
        }
    }
}
