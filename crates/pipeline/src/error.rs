use storyline_core::error::CoreError;

use crate::generation::GenerationError;

/// Errors from storyboard and media pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The target story vanished while a batch run was in progress.
    #[error("Storyboard interrupted after {added} scene(s): {reason}")]
    Interrupted { added: usize, reason: String },
}
