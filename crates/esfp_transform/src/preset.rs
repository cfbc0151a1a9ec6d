//! The default stage list.

use crate::{ArrowFunctions, Exponentiation, Pipeline, TemplateLiterals};

/// Stages applied when the caller does not supply its own list.
///
/// Arrow functions are lowered first so the bodies they produce still go
/// through the later stages.
pub fn esfp_preset() -> Pipeline {
    Pipeline::new()
        .with_stage(ArrowFunctions)
        .with_stage(TemplateLiterals)
        .with_stage(Exponentiation)
}
